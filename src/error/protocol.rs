//! Protocol error module.
//!
//! This module defines error types that may occur while turning inbound text
//! into protocol messages and while compiling resource templates.

use thiserror::Error;

use crate::protocol::mcp::template::TemplateError;

/// Errors that can occur during protocol operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Error when the JSON-RPC message is invalid.
    #[error("Invalid JSON-RPC message: {0}")]
    InvalidMessage(String),

    /// Error when the message exceeds the maximum allowed size.
    #[error("Message size exceeds maximum allowed: {size} > {max_size}")]
    MessageTooLarge {
        /// The actual size of the message in bytes
        size: usize,
        /// The maximum allowed size in bytes
        max_size: usize,
    },

    /// Error when a resource template cannot be compiled.
    #[error("Malformed resource template: {0}")]
    MalformedTemplate(#[from] TemplateError),

    /// Error during protocol initialization.
    #[error("Initialization error: {0}")]
    InitializationError(String),
}
