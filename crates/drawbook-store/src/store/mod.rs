//! DocumentStore: SQLite persistence for canvas documents.
//!
//! The connection pool is opened lazily on first use and cached for the
//! lifetime of the store. Every public operation goes through
//! [`DocumentStore::initialize`], so callers never race the startup path.

use crate::error::{Error, Result};

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tracing::{debug, info};

mod crud;
mod migrations;

#[cfg(test)]
mod tests;

pub use migrations::SCHEMA_VERSION;

/// Fixed database name; the file on disk is `<data_dir>/drawbook.db`
pub const DB_NAME: &str = "drawbook";

/// Default data directory (`~/.drawbook`)
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".drawbook"))
        .unwrap_or_else(|| PathBuf::from(".drawbook"))
}

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A database file on disk
    File(PathBuf),
    /// A private in-memory database (for tests)
    Memory,
}

/// SQLite-backed canvas document store.
pub struct DocumentStore {
    location: StoreLocation,
    max_connections: u32,
    pool: OnceCell<SqlitePool>,
}

impl DocumentStore {
    /// Store backed by `<data_dir>/drawbook.db`
    #[must_use]
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::at_path(data_dir.join(format!("{DB_NAME}.db")))
    }

    /// Store backed by an explicit database file
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            max_connections: 4,
            pool: OnceCell::new(),
        }
    }

    /// In-memory store (for tests).
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            max_connections: 1,
            pool: OnceCell::new(),
        }
    }

    /// Configure the pool size (ignored for in-memory stores)
    #[must_use]
    pub fn with_max_connections(mut self, max: u32) -> Self {
        if self.location != StoreLocation::Memory {
            self.max_connections = max.max(1);
        }
        self
    }

    /// Where this store keeps its data
    #[must_use]
    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Whether the pool has been opened
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.pool.initialized()
    }

    /// Open the database and bring its schema up to [`SCHEMA_VERSION`].
    ///
    /// Safe to call any number of times, including concurrently: every caller
    /// ends up with the same pool. A failed attempt leaves the store
    /// uninitialized so a later call can try again.
    pub async fn initialize(&self) -> Result<()> {
        self.pool().await.map(|_| ())
    }

    /// Close the pool if it was opened
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }

    pub(crate) async fn pool(&self) -> Result<&SqlitePool> {
        self.pool.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<SqlitePool> {
        let pool = match &self.location {
            StoreLocation::File(db_path) => {
                if let Some(parent) = db_path.parent() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| Error::unavailable(format!("mkdir: {e}")))?;
                }
                let url = format!("sqlite:{}?mode=rwc", db_path.display());
                let pool = SqlitePoolOptions::new()
                    .max_connections(self.max_connections)
                    .connect(&url)
                    .await
                    .map_err(|e| Error::unavailable(e.to_string()))?;

                // Enable WAL for read/write concurrency
                sqlx::query("PRAGMA journal_mode=WAL")
                    .execute(&pool)
                    .await
                    .map_err(|e| Error::unavailable(e.to_string()))?;
                pool
            }
            StoreLocation::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
                .map_err(|e| Error::unavailable(e.to_string()))?,
        };

        migrations::run_migrations(&pool).await?;

        match &self.location {
            StoreLocation::File(path) => info!("Canvas store initialized at {}", path.display()),
            StoreLocation::Memory => debug!("In-memory canvas store initialized"),
        }
        Ok(pool)
    }
}
