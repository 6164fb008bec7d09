//! Typed slash command requests
//!
//! Options arrive from Discord as loosely typed values; they are checked here
//! once so the dispatcher only ever sees well-formed requests.

use std::fmt;

use thiserror::Error;

const MAX_USERNAME_LEN: usize = 64;
const MAX_COIN_LEN: usize = 16;
const MAX_CREDENTIAL_LEN: usize = 4096;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("`{0}` must not be empty")]
    Empty(&'static str),
    #[error("`{field}` must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("`coin` must only contain letters and digits")]
    InvalidSymbol,
}

fn required(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value.to_string())
}

/// `/claim username coin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequest {
    pub guild_id: String,
    pub username: String,
    pub coin: String,
}

impl ClaimRequest {
    pub fn new(
        guild_id: impl Into<String>,
        username: &str,
        coin: &str,
    ) -> Result<Self, ValidationError> {
        let username = required("username", username, MAX_USERNAME_LEN)?;
        let coin = required("coin", coin, MAX_COIN_LEN)?;
        if !coin.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::InvalidSymbol);
        }

        Ok(Self {
            guild_id: guild_id.into(),
            username,
            coin,
        })
    }
}

/// `/register_cookie cookie`
#[derive(Clone)]
pub struct RegisterCredentialRequest {
    pub guild_id: String,
    pub user_id: u64,
    pub owner_id: u64,
    pub credential: String,
}

impl RegisterCredentialRequest {
    pub fn new(
        guild_id: impl Into<String>,
        user_id: u64,
        owner_id: u64,
        credential: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            guild_id: guild_id.into(),
            user_id,
            owner_id,
            credential: required("cookie", credential, MAX_CREDENTIAL_LEN)?,
        })
    }

    pub fn is_owner(&self) -> bool {
        self.user_id == self.owner_id
    }
}

impl fmt::Debug for RegisterCredentialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCredentialRequest")
            .field("guild_id", &self.guild_id)
            .field("user_id", &self.user_id)
            .field("owner_id", &self.owner_id)
            .field("credential", &"<redacted>")
            .finish()
    }
}
