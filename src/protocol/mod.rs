//! Protocol module for the Makai MCP engine.
//!
//! [`jsonrpc`] implements the message layer: wire types, validation, request
//! dispatch and response correlation. [`mcp`] builds the handshake, the
//! capability catalogs, the resource template matcher and the client on top.

pub mod jsonrpc;
pub mod mcp;
