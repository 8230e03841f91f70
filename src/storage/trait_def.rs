use crate::models::UrlRecord;
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("short code already exists")]
    CodeConflict,
    #[error("original URL already exists")]
    UrlConflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Map a failed insert onto the uniqueness constraint it tripped, if any.
///
/// SQLite names the offending column in the message, PostgreSQL reports the
/// constraint name; both mention `original_url` for the URL constraint.
pub(crate) fn classify_insert_error(err: sqlx::Error) -> StorageError {
    let url_conflict = err
        .as_database_error()
        .filter(|db_err| db_err.is_unique_violation())
        .map(|db_err| {
            db_err
                .constraint()
                .unwrap_or_else(|| db_err.message())
                .contains("original_url")
        });

    match url_conflict {
        Some(true) => StorageError::UrlConflict,
        Some(false) => StorageError::CodeConflict,
        None => StorageError::Other(err.into()),
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables and indexes)
    async fn init(&self) -> Result<()>;

    /// Get the record for an original URL
    async fn find_by_url(&self, original_url: &str) -> Result<Option<UrlRecord>>;

    /// Get the record for a short code
    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>>;

    /// Persist a new mapping with zero clicks.
    ///
    /// Fails with [`StorageError::CodeConflict`] or [`StorageError::UrlConflict`]
    /// when a uniqueness constraint rejects the row.
    async fn insert(&self, original_url: &str, short_code: &str) -> StorageResult<UrlRecord>;

    /// Atomically add one click and return the updated record
    async fn increment_clicks(&self, short_code: &str) -> Result<Option<UrlRecord>>;

    /// Number of stored records
    async fn count(&self) -> Result<i64>;
}
