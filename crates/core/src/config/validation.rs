//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `staleness_window_secs` is 0 or exceeds 24 hours
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `backend_url` is not an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.staleness_window_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "staleness_window_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.staleness_window_secs > 86_400 {
            return Err(ConfigError::Invalid {
                field: "staleness_window_secs".into(),
                reason: "must not exceed 24 hours (86400s)".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        let url = Url::parse(&self.backend_url)
            .map_err(|e| ConfigError::Invalid { field: "backend_url".into(), reason: e.to_string() })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Invalid {
                field: "backend_url".into(),
                reason: format!("unsupported scheme: {}", url.scheme()),
            });
        }

        if url.scheme() == "http" && self.viewer_token.is_some() {
            tracing::warn!(
                backend_url = %self.backend_url,
                "viewer_token will be sent over plain http"
            );
        }

        Ok(())
    }
}
