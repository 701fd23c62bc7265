// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Message layer of the protocol.
//!
//! This module holds the wire types, the standard error codes, inbound
//! validation, the server-side dispatcher ([`JsonRpcHandler`]) and the
//! client-side correlator ([`RequestResponseCorrelator`]).
//!
//! # Example
//!
//! ```
//! use makai_mcp_lib::protocol::jsonrpc::{JsonRpcHandler, Response};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let handler = JsonRpcHandler::new();
//! handler.register_method("echo", |params, _ctx| async move { Ok(params) });
//!
//! let reply = handler
//!     .handle_request(r#"{"jsonrpc":"2.0","method":"echo","params":{"a":1},"id":"7"}"#)
//!     .await
//!     .unwrap();
//! let response: Response = serde_json::from_str(&reply).unwrap();
//! assert_eq!(response.result, Some(json!({"a": 1})));
//! # });
//! ```

pub mod correlation;
pub mod error;
pub mod handler;
pub mod types;
pub mod validation;

// Re-exports
pub use correlation::{CorrelationError, PendingResponse, RequestResponseCorrelator, ResponseOutcome};
pub use error::{Error, ErrorCode, JsonRpcError, Result};
pub use handler::{
    JsonRpcHandler, MethodContext, MethodHandler, MethodHandlerFn, MethodHandlerFuture, MethodResult,
    DEFAULT_MAX_MESSAGE_SIZE,
};
pub use types::{Id, Message, Request, Response};
pub use validation::{validate_request, ValidatedMessage};

#[cfg(test)]
mod tests;
