//! Session configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_USERS_TABLE: &str = "users";
pub const DEFAULT_STORAGE_KEY: &str = "user";
pub const DEFAULT_STORAGE_PATH: &str = ".staff-session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required env var {var}")]
    Missing { var: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for StoreTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Remote user-store connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Project base URL, without trailing slash.
    pub url: String,
    pub api_key: String,
    pub users_table: String,
    pub timeouts: StoreTimeouts,
}

impl StoreConfig {
    /// Build store config from environment variables.
    ///
    /// Required:
    /// - `SESSION_STORE_URL`
    /// - `SESSION_STORE_API_KEY`
    ///
    /// Optional:
    /// - `SESSION_USERS_TABLE`: default `users`
    /// - `SESSION_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SESSION_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if a required variable is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = required("SESSION_STORE_URL")?.trim_end_matches('/').to_string();
        let api_key = required("SESSION_STORE_API_KEY")?;
        let users_table = optional("SESSION_USERS_TABLE").unwrap_or_else(|| DEFAULT_USERS_TABLE.to_string());
        let timeouts = StoreTimeouts {
            request_secs: env_parse_u64("SESSION_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("SESSION_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { url, api_key, users_table, timeouts })
    }
}

/// Local session persistence settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Key under which the user snapshot is stored.
    pub storage_key: String,
    /// File backing [`crate::storage::FileStorage`].
    pub storage_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { storage_key: DEFAULT_STORAGE_KEY.to_string(), storage_path: PathBuf::from(DEFAULT_STORAGE_PATH) }
    }
}

impl SessionConfig {
    /// Build session config from `SESSION_STORAGE_KEY` and
    /// `SESSION_STORAGE_PATH`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            storage_key: optional("SESSION_STORAGE_KEY").unwrap_or(defaults.storage_key),
            storage_path: optional("SESSION_STORAGE_PATH").map_or(defaults.storage_path, PathBuf::from),
        }
    }

    /// Config with an explicit storage key, used to isolate sessions.
    #[must_use]
    pub fn with_storage_key(key: impl Into<String>) -> Self {
        Self { storage_key: key.into(), ..Self::default() }
    }
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing { var: key })
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    optional(key).and_then(|v| v.parse::<u64>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
