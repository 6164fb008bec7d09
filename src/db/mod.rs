use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::{debug, info};

pub mod credential;

pub use credential::CredentialStore;

const CREATE_TABLES_SQL: &str = include_str!("../../migrations/create_tables.sql");

/// The credential store could not be reached or the statement failed.
#[derive(Debug, Error)]
#[error("storage error: {0}")]
pub struct StorageError(#[from] sqlx::Error);

/// Open (creating if missing) the SQLite database and create tables
pub async fn init_db(database_url: &str) -> Result<SqlitePool, StorageError> {
    info!("Opening credential database: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .pragma("synchronous", "NORMAL");

    // SQLite is single-writer, but readers can run alongside
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Open an in-memory database that lives as long as the pool
#[cfg(test)]
pub async fn open_in_memory() -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    // Every connection to :memory: is its own database, so pin exactly one
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

async fn create_tables(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::raw_sql(CREATE_TABLES_SQL).execute(pool).await?;
    debug!("Credential tables ready");
    Ok(())
}
