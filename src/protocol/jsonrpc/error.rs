// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error codes and error objects carried on the wire.
//!
//! Codes follow the [JSON-RPC 2.0 convention](https://www.jsonrpc.org/specification#error_object).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::Id;

/// Standard error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Parse error (-32700)
    /// Invalid JSON was received.
    ParseError = -32700,

    /// Invalid Request (-32600)
    /// The JSON sent is not a valid request object.
    InvalidRequest = -32600,

    /// Method not found (-32601)
    /// The method does not exist / is not available.
    MethodNotFound = -32601,

    /// Invalid params (-32602)
    InvalidParams = -32602,

    /// Internal error (-32603)
    InternalError = -32603,

    /// Server error (-32000)
    /// A handler failed or returned a malformed result.
    ServerError = -32000,
}

impl ErrorCode {
    /// Returns a string description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid Request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::ServerError => "Server error",
        }
    }

    /// Create an ErrorCode from a raw integer value.
    ///
    /// Returns None if the code is not a predefined error code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -32700 => Some(ErrorCode::ParseError),
            -32600 => Some(ErrorCode::InvalidRequest),
            -32601 => Some(ErrorCode::MethodNotFound),
            -32602 => Some(ErrorCode::InvalidParams),
            -32603 => Some(ErrorCode::InternalError),
            c if (-32099..=-32000).contains(&c) => Some(ErrorCode::ServerError),
            _ => None,
        }
    }

    /// Returns the integer error code.
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> i32 {
        code as i32
    }
}

/// Error object as carried in the `error` member of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message} ({code})")]
pub struct JsonRpcError {
    /// The error code
    pub code: i32,

    /// A short description of the error
    pub message: String,

    /// Additional information about the error (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    /// Creates a new error object.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
        }
    }

    /// Creates a new error object with additional data.
    pub fn with_data(code: ErrorCode, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Creates a standard parse error.
    pub fn parse_error<S: Into<String>>(detail: S) -> Self {
        Self::new(ErrorCode::ParseError, format!("Parse error: {}", detail.into()))
    }

    /// Creates a standard invalid request error.
    pub fn invalid_request<S: Into<String>>(reason: S) -> Self {
        Self::new(
            ErrorCode::InvalidRequest,
            format!("Invalid request: {}", reason.into()),
        )
    }

    /// Creates a standard method not found error.
    pub fn method_not_found<S: Into<String>>(method: S) -> Self {
        Self::new(
            ErrorCode::MethodNotFound,
            format!("Method not found: {}", method.into()),
        )
    }

    /// Creates the generic error reported when a handler fails.
    pub fn server_error<S: Into<String>>(msg: S) -> Self {
        Self::new(ErrorCode::ServerError, format!("Server error: {}", msg.into()))
    }

    /// Creates a standard internal error.
    pub fn internal_error<S: Into<String>>(msg: S) -> Self {
        Self::new(
            ErrorCode::InternalError,
            format!("Internal error: {}", msg.into()),
        )
    }
}

/// Reasons an inbound message cannot be dispatched.
#[derive(Debug, Error)]
pub enum Error {
    /// The text is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is not a usable request.
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// Identifier recovered from the message, if any
        id: Option<Id>,
        /// What is wrong with the message
        reason: String,
    },
}

impl Error {
    /// Converts the error to the error object sent back to the peer.
    pub fn to_jsonrpc_error(&self) -> JsonRpcError {
        match self {
            Error::Json(e) => JsonRpcError::parse_error(e.to_string()),
            Error::InvalidRequest { reason, .. } => JsonRpcError::invalid_request(reason.as_str()),
        }
    }

    /// The identifier a response to this error should be addressed to.
    pub fn id(&self) -> Option<&Id> {
        match self {
            Error::Json(_) => None,
            Error::InvalidRequest { id, .. } => id.as_ref(),
        }
    }
}

/// Specialized Result type for message validation.
pub type Result<T> = std::result::Result<T, Error>;
