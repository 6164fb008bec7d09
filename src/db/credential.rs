use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use super::StorageError;
use crate::models::GuildEntry;

/// Guild-scoped Rugplay credentials.
///
/// Every operation is a single SQL statement, so a reader never observes a
/// half-written row even while the admin dashboard and slash commands hit the
/// store at the same time.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the stored credential for a guild
    pub async fn get(&self, guild_id: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT credential FROM guild_credentials WHERE guild_id = ?")
            .bind(guild_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<String, _>("credential")))
    }

    /// Insert or replace the credential for a guild.
    /// `registered_at` is reset on replace.
    pub async fn upsert(&self, guild_id: &str, credential: &str) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO guild_credentials (guild_id, credential, registered_at) VALUES (?, ?, ?) \
             ON CONFLICT(guild_id) DO UPDATE SET \
             credential = excluded.credential, registered_at = excluded.registered_at",
        )
        .bind(guild_id)
        .bind(credential)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a guild's credential; absent rows are not an error
    pub async fn delete(&self, guild_id: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM guild_credentials WHERE guild_id = ?")
            .bind(guild_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Snapshot of registered guilds, oldest registration first
    pub async fn list(&self) -> Result<Vec<GuildEntry>, StorageError> {
        let rows = sqlx::query(
            "SELECT guild_id, registered_at FROM guild_credentials ORDER BY registered_at, guild_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| GuildEntry {
                guild_id: r.get::<String, _>("guild_id"),
                registered_at: r.get::<DateTime<Utc>, _>("registered_at"),
            })
            .collect())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
