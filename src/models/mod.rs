pub mod url;

pub use url::{ShortenRequest, ShortenResponse, StatsResponse, UrlRecord};
