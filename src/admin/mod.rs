//! Operator access to the credential store
//!
//! One shared secret unlocks a session; sessions only live in memory and are
//! lost on restart.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::{CredentialStore, StorageError};
use crate::models::GuildEntry;

pub mod routes;
mod templates;

pub use routes::router;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("invalid admin token")]
    Unauthorized,
    #[error("not logged in")]
    Unauthenticated,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Opaque handle for a logged-in operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

pub struct AdminSurface {
    store: Arc<CredentialStore>,
    secret: String,
    sessions: RwLock<HashSet<String>>,
}

impl AdminSurface {
    pub fn new(store: Arc<CredentialStore>, secret: String) -> Self {
        Self {
            store,
            secret,
            sessions: RwLock::new(HashSet::new()),
        }
    }

    /// Trade the shared secret for a fresh session
    pub async fn authenticate(&self, secret: &str) -> Result<SessionToken, AdminError> {
        if secret != self.secret {
            warn!("Admin login rejected");
            return Err(AdminError::Unauthorized);
        }

        let token = Uuid::new_v4().simple().to_string();
        self.sessions.write().await.insert(token.clone());
        info!("Admin session opened");

        Ok(SessionToken(token))
    }

    async fn require_session(&self, token: Option<&str>) -> Result<(), AdminError> {
        let token = token.ok_or(AdminError::Unauthenticated)?;
        if self.sessions.read().await.contains(token) {
            Ok(())
        } else {
            Err(AdminError::Unauthenticated)
        }
    }

    pub async fn list_guilds(&self, token: Option<&str>) -> Result<Vec<GuildEntry>, AdminError> {
        self.require_session(token).await?;
        Ok(self.store.list().await?)
    }

    /// Delete a guild's credential
    pub async fn revoke(&self, token: Option<&str>, guild_id: &str) -> Result<(), AdminError> {
        self.require_session(token).await?;
        self.store.delete(guild_id).await?;
        info!("Admin revoked cookie for guild {}", guild_id);
        Ok(())
    }

    pub async fn logout(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }
}
