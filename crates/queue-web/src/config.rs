//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Queue web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Allowed CORS origin, `*` for any.
    pub cors_origin: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `QUEUE_ADDR` | Server bind address | `127.0.0.1:5000` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:queue.db?mode=rwc` |
    /// | `CORS_ORIGIN` | Allowed CORS origin | `*` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("QUEUE_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "sqlite:queue.db?mode=rwc".to_string());

        let cors_origin = env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string());

        Ok(Self {
            addr,
            database_url,
            cors_origin,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid QUEUE_ADDR format")]
    InvalidAddr,
}
