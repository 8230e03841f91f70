use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::config::RedirectMode;
use crate::error::AppError;
use crate::service::UrlService;
use url::Url;

pub struct RedirectState {
    pub service: Arc<UrlService>,
    pub redirect_mode: RedirectMode,
}

/// Redirect to original URL
///
/// Every response disables caching so each navigation reaches the server
/// and is counted.
pub async fn redirect_url(
    State(state): State<Arc<RedirectState>>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let record = state.service.resolve(&code).await?;

    let location = location_value(&record.original_url).ok_or_else(|| {
        tracing::error!(short_code = %code, "stored URL is not a valid Location header");
        AppError::DataIntegrity("Stored URL is invalid".to_string())
    })?;

    let headers = [
        (header::LOCATION, location),
        (
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ),
        (header::PRAGMA, HeaderValue::from_static("no-cache")),
        (header::EXPIRES, HeaderValue::from_static("0")),
    ];

    Ok((state.redirect_mode.status_code(), headers).into_response())
}

/// The stored URL as-is, or its ASCII serialization when it carries
/// characters a header cannot hold (IDN hosts, unescaped unicode paths).
fn location_value(original_url: &str) -> Option<HeaderValue> {
    if original_url.is_ascii() {
        return HeaderValue::from_str(original_url).ok();
    }

    let parsed = Url::parse(original_url).ok()?;
    HeaderValue::from_str(parsed.as_str()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_urls_are_kept_verbatim() {
        let value = location_value("https://example.com").unwrap();
        assert_eq!(value.to_str().unwrap(), "https://example.com");
    }

    #[test]
    fn unicode_urls_are_encoded() {
        let value = location_value("https://bücher.example/straße").unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "https://xn--bcher-kva.example/stra%C3%9Fe"
        );
    }
}
