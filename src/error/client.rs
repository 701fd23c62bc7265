//! Client error module.
//!
//! These are the failures an MCP client caller can observe. Remote errors carry
//! the peer's error object; everything else is local and never crosses the wire.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use super::transport::TransportError;

/// Errors returned by [`crate::protocol::mcp::McpClient`] operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The handshake has not completed (or the client was disconnected).
    #[error("Client not connected")]
    NotConnected,

    /// `connect` was called on a client that is already connected.
    #[error("Client already connected")]
    AlreadyConnected,

    /// No response arrived within the request's timeout.
    #[error("Request `{method}` timed out after {timeout:?}")]
    Timeout {
        /// The method that was called
        method: String,
        /// The timeout that elapsed
        timeout: Duration,
    },

    /// The server answered with an error object.
    #[error("Server error: {message} ({code})")]
    Remote {
        /// JSON-RPC error code
        code: i32,
        /// Error message from the server
        message: String,
        /// Optional error payload
        data: Option<Value>,
    },

    /// The connection went away while the request was outstanding.
    #[error("Connection closed before a response was received")]
    ConnectionClosed,

    /// The server's result does not have the expected shape.
    #[error("Invalid response to `{method}`: {reason}")]
    InvalidResponse {
        /// The method that was called
        method: String,
        /// Why the result was rejected
        reason: String,
    },

    /// The transport failed to deliver the request.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Returns true for failures reported by the remote side.
    pub fn is_remote(&self) -> bool {
        matches!(self, ClientError::Remote { .. })
    }

    /// Returns true for local timeouts.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }
}
