//! Client configuration module.

use std::time::Duration;

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Name reported in the handshake
    pub name: String,

    /// Version reported in the handshake
    pub version: String,

    /// Default per-request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Timeout for the `initialize` handshake in milliseconds
    pub handshake_timeout_ms: u64,
}

impl ClientConfig {
    /// Default per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Handshake timeout as a [`Duration`].
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: "makai-mcp-client".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            request_timeout_ms: 30_000,
            handshake_timeout_ms: 10_000,
        }
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Client name cannot be empty".to_string(),
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.handshake_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "handshake_timeout_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
