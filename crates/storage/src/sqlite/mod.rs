//! `SQLite` backend: one pool shared by every repository trait.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

use crate::repository::Storage;

mod feedback_repo;
mod mapping;
mod migrate;
mod progress_repo;
mod record_repo;

const MAX_CONNECTIONS: u32 = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error("invalid database url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: sqlx::Error,
    },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Parse `database_url` into options for the quiz database.
///
/// The file is created on first use. File databases run in WAL mode.
///
/// # Errors
///
/// Returns `SqliteInitError::InvalidUrl` if the URL cannot be parsed.
pub fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, SqliteInitError> {
    let options = SqliteConnectOptions::from_str(database_url).map_err(|source| {
        SqliteInitError::InvalidUrl {
            url: database_url.to_string(),
            source,
        }
    })?;
    let options = options
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);
    if is_memory_url(database_url) {
        Ok(options)
    } else {
        Ok(options.journal_mode(SqliteJournalMode::Wal))
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url == "sqlite::memory:" || database_url.contains("mode=memory")
}

impl SqliteRepository {
    /// Open (creating if needed) the quiz database at `database_url`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` for an unparsable URL or a failed connection.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let options = connect_options(database_url)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(BUSY_TIMEOUT)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bring the schema up to the latest version.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if a migration fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Connect, migrate, and expose the database through every repository.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = Arc::new(SqliteRepository::connect(database_url).await?);
        repo.migrate().await?;
        Ok(Self {
            progress: repo.clone(),
            identity: repo.clone(),
            feedback: repo.clone(),
            records: repo,
        })
    }
}
