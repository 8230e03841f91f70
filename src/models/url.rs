use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UrlRecord {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    /// Unix timestamp in milliseconds, set once at insertion
    pub created_at: i64,
    pub clicks: i64,
}

impl UrlRecord {
    /// `created_at` as an ISO-8601 UTC timestamp
    pub fn created_at_iso(&self) -> String {
        DateTime::<Utc>::from_timestamp_millis(self.created_at)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: String,
    pub short_code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub short_code: String,
    pub original_url: String,
    pub created_at: String,
    pub clicks: i64,
}

impl From<UrlRecord> for StatsResponse {
    fn from(record: UrlRecord) -> Self {
        let created_at = record.created_at_iso();
        Self {
            short_code: record.short_code,
            original_url: record.original_url,
            created_at,
            clicks: record.clicks,
        }
    }
}
