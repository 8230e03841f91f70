//! Shorten, redirect and stats operations on top of a [`Storage`] backend.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::normalize_base_url;
use crate::error::AppError;
use crate::models::UrlRecord;
use crate::shortcode::{has_valid_shape, CodeGenerator, RandomCodeGenerator};
use crate::storage::{Storage, StorageError};
use crate::validation::is_valid_url;


/// Result of a shorten request.
#[derive(Debug, Clone)]
pub enum ShortenOutcome {
    /// A new record was inserted
    Created(UrlRecord),
    /// The URL was already mapped; nothing was written
    Existing(UrlRecord),
}

impl ShortenOutcome {
    pub fn record(&self) -> &UrlRecord {
        match self {
            ShortenOutcome::Created(record) | ShortenOutcome::Existing(record) => record,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, ShortenOutcome::Created(_))
    }
}

pub struct UrlService {
    storage: Arc<dyn Storage>,
    generator: Arc<dyn CodeGenerator>,
    base_url: String,
    max_attempts: usize,
}

impl UrlService {
    pub fn new(storage: Arc<dyn Storage>, base_url: &str, max_attempts: usize) -> Self {
        Self::with_generator(
            storage,
            Arc::new(RandomCodeGenerator::default()),
            base_url,
            max_attempts,
        )
    }

    pub fn with_generator(
        storage: Arc<dyn Storage>,
        generator: Arc<dyn CodeGenerator>,
        base_url: &str,
        max_attempts: usize,
    ) -> Self {
        Self {
            storage,
            generator,
            base_url: normalize_base_url(base_url),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }

    /// Map `url` to a short code, reusing the existing mapping when there is one.
    ///
    /// Insert conflicts caused by concurrent requests are retried: a taken code
    /// triggers a fresh code, a taken URL resolves to the record that won.
    pub async fn shorten(&self, url: Option<&str>) -> Result<ShortenOutcome, AppError> {
        let url = match url {
            Some(url) if !url.is_empty() => url,
            _ => return Err(AppError::Validation("URL is required".to_string())),
        };

        if !is_valid_url(url) {
            return Err(AppError::Validation("Invalid URL".to_string()));
        }

        for attempt in 1..=self.max_attempts {
            if let Some(existing) = self.storage.find_by_url(url).await? {
                debug!(short_code = %existing.short_code, "reusing existing mapping");
                return Ok(ShortenOutcome::Existing(existing));
            }

            let short_code = self.unique_code().await?;

            match self.storage.insert(url, &short_code).await {
                Ok(record) => {
                    info!(short_code = %record.short_code, "created short URL");
                    return Ok(ShortenOutcome::Created(record));
                }
                Err(StorageError::CodeConflict) => {
                    warn!(%short_code, attempt, "short code taken between check and insert, retrying");
                }
                Err(StorageError::UrlConflict) => {
                    warn!(attempt, "URL inserted concurrently, loading the winning record");
                    if let Some(existing) = self.storage.find_by_url(url).await? {
                        return Ok(ShortenOutcome::Existing(existing));
                    }
                }
                Err(StorageError::Other(err)) => {
                    error!(error = %err, "failed to insert short URL");
                    return Err(AppError::Internal(err.to_string()));
                }
            }
        }

        Err(AppError::Internal(
            "Failed to create short URL after repeated conflicts".to_string(),
        ))
    }

    /// Generate a code that is absent from storage at the time of the check.
    async fn unique_code(&self) -> Result<String, AppError> {
        for _ in 0..self.max_attempts {
            let code = self.generator.generate();

            if self.storage.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }

            warn!(short_code = %code, "generated short code already in use");
        }

        Err(AppError::Internal(
            "Failed to generate unique short code".to_string(),
        ))
    }

    /// Resolve a short code for redirecting, counting the click.
    pub async fn resolve(&self, short_code: &str) -> Result<UrlRecord, AppError> {
        if !has_valid_shape(short_code) {
            return Err(AppError::Validation("Invalid URL format".to_string()));
        }

        let record = self
            .storage
            .find_by_code(short_code)
            .await
            .map_err(|err| {
                error!(%short_code, error = %err, "lookup failed during redirect");
                AppError::from(err)
            })?
            .ok_or(AppError::NotFound)?;

        if !is_valid_url(&record.original_url) {
            error!(%short_code, "stored URL failed validation");
            return Err(AppError::DataIntegrity("Stored URL is invalid".to_string()));
        }

        self.storage
            .increment_clicks(short_code)
            .await
            .map_err(|err| {
                error!(%short_code, error = %err, "failed to count click");
                AppError::from(err)
            })?
            .ok_or(AppError::NotFound)
    }

    /// Read a record without touching its click counter.
    pub async fn stats(&self, short_code: &str) -> Result<UrlRecord, AppError> {
        self.storage
            .find_by_code(short_code)
            .await?
            .ok_or(AppError::NotFound)
    }
}
