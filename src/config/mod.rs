use anyhow::Context;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    /// Public address short URLs are built from, without a trailing slash
    pub base_url: String,
    pub short_code: ShortCodeConfig,
    pub redirect_status: RedirectMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortCodeConfig {
    /// Upper bound on generation attempts and on insert-conflict retries
    pub max_attempts: usize,
}

/// Status code used for redirect responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectMode {
    /// 302 Found
    #[default]
    Found,
    /// 307 Temporary Redirect
    Temporary,
    /// 308 Permanent Redirect
    Permanent,
}

impl RedirectMode {
    pub fn status_code(self) -> StatusCode {
        match self {
            RedirectMode::Found => StatusCode::FOUND,
            RedirectMode::Temporary => StatusCode::TEMPORARY_REDIRECT,
            RedirectMode::Permanent => StatusCode::PERMANENT_REDIRECT,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "found" | "302" => Some(RedirectMode::Found),
            "temporary" | "307" => Some(RedirectMode::Temporary),
            "permanent" | "308" => Some(RedirectMode::Permanent),
            _ => None,
        }
    }
}

impl ShortCodeConfig {
    pub const fn default_max_attempts() -> usize {
        10
    }
}

pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            _ => DatabaseBackend::Sqlite,
        };

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./urls.db".to_string());

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let base_url = std::env::var("BASE_URL")
            .map(|v| normalize_base_url(&v))
            .unwrap_or_else(|_| format!("http://{host}:{port}"));

        let max_attempts = match std::env::var("SHORT_CODE_MAX_ATTEMPTS") {
            Ok(v) => v
                .parse::<usize>()
                .context("SHORT_CODE_MAX_ATTEMPTS must be a positive integer")?,
            Err(_) => ShortCodeConfig::default_max_attempts(),
        };
        if max_attempts == 0 {
            anyhow::bail!("SHORT_CODE_MAX_ATTEMPTS must be at least 1");
        }

        let redirect_status = match std::env::var("REDIRECT_STATUS") {
            Ok(v) => RedirectMode::parse(&v).unwrap_or_else(|| {
                tracing::warn!(
                    "Unknown REDIRECT_STATUS '{v}', falling back to 'found'. Supported values: found, temporary, permanent"
                );
                RedirectMode::Found
            }),
            Err(_) => RedirectMode::default(),
        };

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
            },
            server: ServerConfig { host, port },
            base_url,
            short_code: ShortCodeConfig { max_attempts },
            redirect_status,
        })
    }
}
