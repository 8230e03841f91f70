use crate::models::UrlRecord;
use crate::storage::trait_def::classify_insert_error;
use crate::storage::{Storage, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS urls (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                original_url TEXT NOT NULL UNIQUE,
                short_code TEXT NOT NULL UNIQUE,
                created_at INTEGER NOT NULL,
                clicks INTEGER NOT NULL DEFAULT 0
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
            WHERE original_url = ?
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
            WHERE short_code = ?
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
            VALUES (?, ?, ?, 0)
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
            WHERE short_code = ?
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
