//! SQLite persistence layer for the ticket queue.
//!
//! This crate persists windows and daily ticket pools using SQLx with
//! SQLite, and exposes the result to the core as a
//! [`queue_core::QueueStore`] implementation.
//!
//! # Example
//!
//! ```no_run
//! use database::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:queue.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let windows = database::window::list_windows(db.pool()).await?;
//!     println!("{} windows", windows.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod queue;
pub mod window;

pub use error::{DatabaseError, Result};
pub use models::{PoolRow, WindowRow};

use async_trait::async_trait;
use chrono::NaiveDate;
use queue_core::pool::TicketPool;
use queue_core::store::{QueueStore, StoreError};
use queue_core::window::Window;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 5;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist, or
    /// `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl QueueStore for Database {
    async fn load_windows(&self) -> std::result::Result<Vec<Window>, StoreError> {
        window::list_windows(&self.pool)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }

    async fn save_window(&self, w: &Window) -> std::result::Result<(), StoreError> {
        window::upsert_window(&self.pool, w)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }

    async fn delete_window(&self, id: &str) -> std::result::Result<(), StoreError> {
        window::delete_window(&self.pool, id)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }

    async fn load_pool(
        &self,
        day: NaiveDate,
    ) -> std::result::Result<Option<TicketPool>, StoreError> {
        queue::get_pool(&self.pool, day)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }

    async fn save_pool(&self, pool: &TicketPool) -> std::result::Result<(), StoreError> {
        queue::upsert_pool(&self.pool, pool)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }
}
