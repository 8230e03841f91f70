use crate::models::UrlRecord;
use crate::storage::trait_def::classify_insert_error;
use crate::storage::{Storage, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS urls (
                id BIGSERIAL PRIMARY KEY,
                original_url TEXT NOT NULL,
                short_code TEXT NOT NULL,
                created_at BIGINT NOT NULL,
                clicks BIGINT NOT NULL DEFAULT 0,
                CONSTRAINT urls_original_url_key UNIQUE (original_url),
                CONSTRAINT urls_short_code_key UNIQUE (short_code)
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_by_url(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        let url = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT id, original_url, short_code, created_at, clicks
            FROM urls
            WHERE original_url = $1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(url)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>> {
        let url = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT id, original_url, short_code, created_at, clicks
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(url)
    }

    async fn insert(&self, original_url: &str, short_code: &str) -> StorageResult<UrlRecord> {
        let created_at = chrono::Utc::now().timestamp_millis();

        let url = sqlx::query_as::<_, UrlRecord>(
            r#"
            INSERT INTO urls (original_url, short_code, created_at, clicks)
            VALUES ($1, $2, $3, 0)
            RETURNING id, original_url, short_code, created_at, clicks
            "#,
        )
        .bind(original_url)
        .bind(short_code)
        .bind(created_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(classify_insert_error)?;

        Ok(url)
    }

    async fn increment_clicks(&self, short_code: &str) -> Result<Option<UrlRecord>> {
        let url = sqlx::query_as::<_, UrlRecord>(
            r#"
            UPDATE urls
            SET clicks = clicks + 1
            WHERE short_code = $1
            RETURNING id, original_url, short_code, created_at, clicks
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(url)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
