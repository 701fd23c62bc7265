//! Transport error module.
//!
//! This module defines error types that may occur in the stdio, child process
//! and in-memory transport implementations.

use std::io;
use thiserror::Error;

/// Errors that can occur during transport operations.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Error when the child process cannot be started.
    #[error("Failed to spawn `{command}`: {source}")]
    SpawnError {
        /// The command that failed to start
        command: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when reading from or writing to the underlying stream.
    #[error("Stream I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error when an outbound message contains an embedded newline.
    #[error("Message contains an embedded newline and cannot be framed")]
    EmbeddedNewline,

    /// Error when the transport is used before `connect`.
    #[error("Transport not connected")]
    NotConnected,

    /// Error when `connect` is called twice.
    #[error("Transport already connected")]
    AlreadyConnected,

    /// Error when the peer has gone away.
    #[error("Transport closed")]
    Closed,
}
