//! SQLite connection ownership for the shelf service.
//!
//! The [`Database`] handle is created once at bootstrap and cloned into
//! whatever needs storage access. Closing it drains the pool; it must be the
//! last thing the process does before exiting.

use std::str::FromStr;
use std::time::Instant;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

/// URL for a private in-memory database.
pub const MEMORY_URL: &str = "sqlite::memory:";

pub type DbResult<T> = Result<T, DbError>;

/// Errors raised while opening the pool or bootstrapping tables.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid database url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to open database '{url}': {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("table definition '{id}' failed: {source}")]
    Schema {
        id: String,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Process-wide database handle backed by a SQLite pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool against `url`, creating the database file when missing.
    ///
    /// In-memory URLs are pinned to a single connection that never expires,
    /// otherwise each pooled connection would see its own empty database.
    pub async fn connect(url: &str, max_connections: u32) -> DbResult<Self> {
        let started_at = Instant::now();
        let in_memory = is_memory_url(url);

        if !url.starts_with("sqlite:") {
            return Err(DbError::InvalidUrl {
                url: url.to_string(),
                source: sqlx::Error::Configuration("expected a sqlite: url".into()),
            });
        }

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|source| DbError::InvalidUrl {
                url: url.to_string(),
                source,
            })?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new();
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|source| DbError::Connect {
                url: url.to_string(),
                source,
            })?;

        tracing::info!(
            target: "shelf-db",
            in_memory,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "database pool opened"
        );

        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    pub async fn connect_in_memory() -> DbResult<Self> {
        Self::connect(MEMORY_URL, 1).await
    }

    /// Underlying pool for query execution.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Execute an idempotent table definition contributed by a module.
    pub async fn apply_table(&self, id: &str, ddl: &str) -> DbResult<()> {
        sqlx::raw_sql(ddl)
            .execute(&self.pool)
            .await
            .map_err(|source| DbError::Schema {
                id: id.to_string(),
                source,
            })?;

        tracing::debug!(target: "shelf-db", table = id, "table definition applied");
        Ok(())
    }

    /// Round-trip a trivial statement to confirm the pool is usable.
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection; pending acquires fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(target: "shelf-db", "database pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
