//! Server configuration

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ServerError;

/// Longest accepted access token lifetime (30 days)
pub const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Clone, Deserialize)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Secret used to sign access tokens
    pub token_secret: String,

    /// Access token lifetime in seconds
    pub token_ttl_secs: i64,

    /// SQLite database path; documents are kept in memory when unset
    pub database_path: Option<String>,

    /// Upper bound on a single store call, in milliseconds
    pub store_timeout_ms: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("token_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("database_path", &self.database_path)
            .field("store_timeout_ms", &self.store_timeout_ms)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            token_secret: String::new(),
            token_ttl_secs: tourbook_core::token::DEFAULT_TOKEN_LIFETIME_SECS,
            database_path: None,
            store_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Load configuration from the environment (and a `.env` file if present)
    pub fn from_env() -> Result<Self, ServerError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let token_secret = env::var("ACCESS_TOKEN_SECRET").unwrap_or_default();
        if token_secret.is_empty() {
            return Err(ServerError::Internal(
                "ACCESS_TOKEN_SECRET must be set".to_string(),
            ));
        }

        let config = Self {
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            token_secret,
            token_ttl_secs: parse_var("TOKEN_TTL_SECS")?.unwrap_or(defaults.token_ttl_secs),
            database_path: env::var("DATABASE_PATH").ok().filter(|p| !p.is_empty()),
            store_timeout_ms: parse_var("STORE_TIMEOUT_MS")?.unwrap_or(defaults.store_timeout_ms),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every token or store call fail
    pub fn validate(&self) -> Result<(), ServerError> {
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs) {
            return Err(ServerError::Internal(format!(
                "TOKEN_TTL_SECS must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_SECS, self.token_ttl_secs
            )));
        }
        if self.store_timeout_ms == 0 {
            return Err(ServerError::Internal(
                "STORE_TIMEOUT_MS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_secs)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ServerError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ServerError::Internal(format!("{} has an invalid value: {}", name, value))),
        Err(_) => Ok(None),
    }
}
