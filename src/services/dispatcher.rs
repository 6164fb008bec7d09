use std::ops::RangeInclusive;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::api::rugplay::{TransferOutcome, TransferRelay};
use crate::db::CredentialStore;
use crate::models::{ClaimRequest, RegisterCredentialRequest};

use super::{DispatchError, Reply};

/// Every claim sends a random amount from this range
pub const CLAIM_AMOUNT_RANGE: RangeInclusive<u32> = 5..=500;

/// Turns slash commands into store lookups and Rugplay transfers.
///
/// Built once at start-up and shared by every interaction handler.
pub struct Dispatcher {
    store: Arc<CredentialStore>,
    relay: Arc<dyn TransferRelay>,
    default_credential: Option<String>,
}

impl Dispatcher {
    /// `default_credential` is used for guilds that never registered a cookie;
    /// pass `None` to refuse those claims instead.
    pub fn new(
        store: Arc<CredentialStore>,
        relay: Arc<dyn TransferRelay>,
        default_credential: Option<String>,
    ) -> Self {
        Self {
            store,
            relay,
            default_credential,
        }
    }

    /// The guild's own cookie, else the deployment default
    pub async fn resolve_credential(&self, guild_id: &str) -> Result<String, DispatchError> {
        if let Some(credential) = self.store.get(guild_id).await? {
            return Ok(credential);
        }

        match &self.default_credential {
            Some(credential) => {
                debug!("Guild {} has no cookie, using default", guild_id);
                Ok(credential.clone())
            }
            None => Err(DispatchError::NoCredentialAvailable),
        }
    }

    /// Relay a random amount of `coin` to `username` using the guild's cookie
    pub async fn claim(&self, request: &ClaimRequest) -> Result<TransferOutcome, DispatchError> {
        // Owned copy: the store is not touched again while the request is in flight
        let credential = self.resolve_credential(&request.guild_id).await?;

        let amount = rand::thread_rng().gen_range(CLAIM_AMOUNT_RANGE);

        let outcome = self
            .relay
            .send_transfer(&credential, &request.username, amount, &request.coin)
            .await;

        if outcome.is_success() {
            info!(
                "Guild {} sent {} {} to {}",
                request.guild_id,
                amount,
                request.coin.to_uppercase(),
                request.username
            );
        } else {
            warn!("Guild {} claim failed: {:?}", request.guild_id, outcome);
        }

        Ok(outcome)
    }

    /// Store the guild's cookie; only the guild owner may do this
    pub async fn register_credential(
        &self,
        request: &RegisterCredentialRequest,
    ) -> Result<(), DispatchError> {
        if !request.is_owner() {
            warn!(
                "User {} tried to register a cookie for guild {} they do not own",
                request.user_id, request.guild_id
            );
            return Err(DispatchError::Unauthorized);
        }

        self.store.upsert(&request.guild_id, &request.credential).await?;
        info!("Cookie registered for guild {}", request.guild_id);

        Ok(())
    }

    /// `claim` with every failure turned into a reply
    pub async fn claim_reply(&self, request: &ClaimRequest) -> Reply {
        match self.claim(request).await {
            Ok(outcome) => Reply::for_claim(&outcome),
            Err(e) => {
                if let DispatchError::Storage(ref inner) = e {
                    error!("Claim for guild {} hit storage: {}", request.guild_id, inner);
                }
                Reply::for_error(&e)
            }
        }
    }

    /// `register_credential` with every failure turned into a reply
    pub async fn register_credential_reply(&self, request: &RegisterCredentialRequest) -> Reply {
        match self.register_credential(request).await {
            Ok(()) => Reply::registered(),
            Err(e) => {
                if let DispatchError::Storage(ref inner) = e {
                    error!("Registering cookie for guild {} failed: {}", request.guild_id, inner);
                }
                Reply::for_error(&e)
            }
        }
    }
}
