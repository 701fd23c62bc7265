//! Makai MCP Library
//!
//! This library contains the core components of the Makai MCP engine: the
//! message layer, the MCP server and client, the resource template matcher
//! and the transports that carry messages between processes. The binary
//! crate wraps it in a command-line tool, but it can also be embedded.
//!
//! # Architecture
//!
//! - [`transport`] moves line-framed messages over stdio, a child process or
//!   an in-memory pair.
//! - [`protocol::jsonrpc`] decodes, validates and dispatches requests and
//!   correlates responses with the calls that are waiting for them.
//! - [`protocol::mcp`] layers the handshake, the tool/resource/prompt
//!   catalogs and the client on top.
//! - [`config`] and [`error`] are shared by all of the above.

// Re-export public modules
pub mod config;
pub mod demo;
pub mod error;
pub mod protocol;
pub mod transport;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for the Makai MCP engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization: installs the tracing-backed error reporter.
pub fn init() {
    error::set_error_reporter(std::sync::Arc::new(error::TracingErrorReporter));
}
