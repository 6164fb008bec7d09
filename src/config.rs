use std::fmt;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite://rugplay.db";
const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process configuration, read from the environment after `.env` is loaded
#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub admin_token: String,
    pub bot_owner_id: Option<u64>,
    pub port: u16,
    pub database_url: String,
    /// Used by guilds that never ran `/register_cookie`
    pub default_credential: Option<String>,
    pub rugplay_base_url: Option<String>,
    pub relay_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        Ok(Self {
            discord_token: required("DISCORD_TOKEN")?,
            admin_token: required("ADMIN_TOKEN")?,
            bot_owner_id: parse(optional("BOT_OWNER_ID"), "BOT_OWNER_ID")?,
            port: parse(optional("PORT"), "PORT")?.unwrap_or(DEFAULT_PORT),
            database_url: optional("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            default_credential: optional("DEFAULT_RUGPLAY_COOKIE"),
            rugplay_base_url: optional("RUGPLAY_BASE_URL"),
            relay_timeout: Duration::from_secs(
                parse(optional("RELAY_TIMEOUT_SECS"), "RELAY_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_RELAY_TIMEOUT_SECS),
            ),
        })
    }
}

fn parse<T>(value: Option<String>, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .map(|v| {
            v.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            })
        })
        .transpose()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"<redacted>")
            .field("admin_token", &"<redacted>")
            .field("bot_owner_id", &self.bot_owner_id)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("default_credential", &self.default_credential.as_ref().map(|_| "<redacted>"))
            .field("rugplay_base_url", &self.rugplay_base_url)
            .field("relay_timeout", &self.relay_timeout)
            .finish()
    }
}
