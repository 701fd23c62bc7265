//! Server configuration module.
//!
//! Identity advertised in the `initialize` handshake plus the runtime knobs of
//! the dispatch loop.

use super::ConfigResult;
use super::Validate;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Protocol revision spoken by this engine.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported in `serverInfo`
    pub name: String,

    /// Version reported in `serverInfo`
    pub version: String,

    /// Protocol version reported by `initialize`
    pub protocol_version: String,

    /// Number of runtime worker threads for handler execution
    pub worker_threads: usize,

    /// Maximum inbound message size in bytes
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "makai-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            worker_threads: num_cpus::get(),
            max_message_size: 10 * 1024 * 1024, // 10 MiB
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Server name cannot be empty".to_string(),
            ));
        }

        if self.version.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Server version cannot be empty".to_string(),
            ));
        }

        if self.protocol_version.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "protocol_version cannot be empty".to_string(),
            ));
        }

        if self.worker_threads == 0 {
            return Err(ConfigError::ValidationError(
                "worker_threads must be greater than 0".to_string(),
            ));
        }

        if self.max_message_size == 0 {
            return Err(ConfigError::ValidationError(
                "max_message_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
