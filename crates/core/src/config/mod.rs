//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FEATURED_*)
//! 2. TOML config file (if FEATURED_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FEATURED_*)
/// 2. TOML config file (if FEATURED_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the feed backend API.
    ///
    /// Set via FEATURED_BACKEND_URL environment variable.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Seconds after a write before the featured cache is considered stale.
    ///
    /// Set via FEATURED_STALENESS_WINDOW_SECS environment variable.
    #[serde(default = "default_staleness_window_secs")]
    pub staleness_window_secs: u64,

    /// Backend request timeout in milliseconds.
    ///
    /// Set via FEATURED_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for backend requests.
    ///
    /// Set via FEATURED_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Bearer token identifying the current viewer to the backend.
    ///
    /// Set via FEATURED_VIEWER_TOKEN environment variable.
    /// Without it the featured list still loads, with follow state unknown,
    /// and follow mutations are rejected.
    #[serde(default)]
    pub viewer_token: Option<String>,
}

fn default_backend_url() -> String {
    "http://localhost:3000/api".into()
}

fn default_staleness_window_secs() -> u64 {
    60
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "featured/0.1".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            staleness_window_secs: default_staleness_window_secs(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            viewer_token: None,
        }
    }
}

impl AppConfig {
    /// Staleness window as Duration for constructing a `FeaturedCache`.
    pub fn staleness_window(&self) -> Duration {
        Duration::from_secs(self.staleness_window_secs)
    }

    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FEATURED_`
    /// 2. TOML file from `FEATURED_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FEATURED_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FEATURED_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
