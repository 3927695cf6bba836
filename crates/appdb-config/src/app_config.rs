//! Application configuration
//!
//! Configuration loaded from `.appdb.toml` or the config directory.

use appdb_client::DeviceLink;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding the configured link token
pub const LINK_TOKEN_ENV: &str = "APPDB_LINK_TOKEN";

/// Application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Language code sent with API calls (affects translated error messages)
    #[serde(default = "default_language")]
    pub language: String,

    /// Token of the linked device; the device counts as linked when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_token: Option<String>,

    /// Number of "not ready" retries before an update check gives up
    #[serde(default = "default_timeout_limit")]
    pub timeout_limit: u32,

    /// Delay between two polls of the same ticket, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Show the pending update count as a badge
    #[serde(default = "default_show_badge")]
    pub show_badge_for_updates: bool,
}

fn default_endpoint() -> String {
    appdb_client::DEFAULT_ENDPOINT.to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout_limit() -> u32 {
    60 // one minute of NOT_READY answers at the default delay
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_show_badge() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            language: default_language(),
            link_token: None,
            timeout_limit: default_timeout_limit(),
            retry_delay_ms: default_retry_delay_ms(),
            show_badge_for_updates: default_show_badge(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then the config directory, or use defaults
    ///
    /// The link token can be overridden with `APPDB_LINK_TOKEN`.
    pub fn load() -> Self {
        let config = Self::from_file_content(crate::load_config_file());
        config.with_link_token_override(std::env::var(LINK_TOKEN_ENV).ok())
    }

    fn from_file_content(content: Option<String>) -> Self {
        if let Some(content) = content {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Replace the link token when an override is given (empty values are ignored)
    pub fn with_link_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            log::debug!("Using link token from {}", LINK_TOKEN_ENV);
            self.link_token = Some(token);
        }
        self
    }

    /// Delay between two polls of the same ticket
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl DeviceLink for AppConfig {
    fn is_linked(&self) -> bool {
        self.link_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
