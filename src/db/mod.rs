//! Database connection management

pub mod schema;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;

pub use schema::init_schema;

/// SQLite connection pool shared by the queue and the ledger
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

fn is_in_memory(url: &str) -> bool {
    matches!(url, ":memory:" | "sqlite::memory:" | "sqlite://:memory:")
}

impl Database {
    /// Open (creating if missing) the database named by `config.url`.
    ///
    /// Accepts a plain file path, a `sqlite://` URL, or `:memory:`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let url = config.url.trim();
        if is_in_memory(url) {
            return Self::in_memory().await;
        }

        let options = if url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(url)?
        } else {
            SqliteConnectOptions::new().filename(url)
        }
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        tracing::info!("SQLite connection pool established ({})", url);
        Ok(Self { pool })
    }

    /// Private in-memory database.
    ///
    /// Each SQLite connection to `:memory:` is a separate database, so the
    /// pool is pinned to one connection that never expires.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create queue and ledger tables if absent
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        schema::init_schema(&self.pool).await
    }

    /// Liveness probe. Reads no queue or ledger data.
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every connection; in-flight transactions finish first
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
