use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Shared secret for admin corrections. Unset disables them.
    pub admin_id: Option<String>,
    pub store_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT").unwrap_or_else(|| "3002".to_string());
        let store_timeout_ms = lookup("STORE_TIMEOUT_MS").unwrap_or_else(|| "5000".to_string());

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: port
                .parse()
                .with_context(|| format!("Invalid PORT: {}", port))?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://guess_ledger.db?mode=rwc".to_string()),
            admin_id: lookup("ADMIN_ID").filter(|id| !id.is_empty()),
            store_timeout: Duration::from_millis(
                store_timeout_ms
                    .parse()
                    .with_context(|| format!("Invalid STORE_TIMEOUT_MS: {}", store_timeout_ms))?,
            ),
        })
    }
}
