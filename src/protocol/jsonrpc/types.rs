// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Wire types for the protocol.
//!
//! Every message on the wire is a single JSON object. Requests carry a
//! `method`, responses carry the `id` of the request they answer plus exactly
//! one of `result` or `error`. A request without an `id` is a notification and
//! is never answered.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::error::JsonRpcError;

/// Protocol version tag written on every outbound message.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier.
///
/// Identifiers generated by this crate are random UUID strings; numeric
/// identifiers from other peers are accepted and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Id {
    /// String identifier
    String(String),

    /// Numeric identifier
    Number(i64),
}

impl Id {
    /// Generates a fresh random identifier.
    pub fn random() -> Self {
        Id::String(uuid::Uuid::new_v4().to_string())
    }

    /// Extracts an identifier from a raw JSON value.
    ///
    /// Returns `None` for `null` and for values that cannot be identifiers
    /// (objects, arrays, booleans, fractional numbers).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Id::String(s.clone())),
            Value::Number(n) => n.as_i64().map(Id::Number),
            _ => None,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "{}", s),
            Id::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::String(value.to_string())
    }
}

/// An outbound request or notification.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Request {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,

    /// Name of the method to be invoked
    pub method: String,

    /// Method parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    /// Request identifier, if None then the request is a notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: impl Into<String>, params: Option<Value>, id: Option<Id>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Creates a request carrying the given id.
    pub fn with_id(method: impl Into<String>, params: Option<Value>, id: Id) -> Self {
        Self::new(method, params, Some(id))
    }

    /// Creates a notification (no id).
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self::new(method, params, None)
    }

    /// Returns true if this request is a notification (no id).
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// An outbound response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Response {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,

    /// Same identifier as the request this is responding to
    pub id: Id,

    /// The result of the method invocation, if successful
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// The error object, if an error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl Response {
    /// Creates a new successful response.
    pub fn success(id: Id, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Creates a new error response.
    pub fn error(id: Id, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Returns true if this response contains an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Any inbound message, before it is known to be a request or a response.
///
/// All fields are optional so that decoding only fails on text that is not a
/// JSON object at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    /// Correlation token
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<Id>,

    /// Method name, present on requests and notifications
    #[serde(default)]
    pub method: Option<String>,

    /// Method parameters
    #[serde(default)]
    pub params: Option<Value>,

    /// Successful result, present on responses
    #[serde(default)]
    pub result: Option<Value>,

    /// Error object, present on error responses
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

impl Message {
    /// Decodes one message from its wire text.
    pub fn decode(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Returns true when the message answers a request rather than making one.
    pub fn is_response(&self) -> bool {
        self.method.is_none() && (self.result.is_some() || self.error.is_some())
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<Id>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Id::from_value(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::jsonrpc::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = Request::with_id("tools/call", Some(json!({"name": "add"})), Id::from("abc"));

        let json_str = serde_json::to_string(&request).unwrap();
        let expected = r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"add"},"id":"abc"}"#;
        assert_eq!(json_str, expected);
    }

    #[test]
    fn test_notification_serialization() {
        let notification = Request::notification("notifications/initialized", None);

        let json_str = serde_json::to_string(&notification).unwrap();
        assert_eq!(json_str, r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#);
        assert!(notification.is_notification());
    }

    #[test]
    fn test_response_serialization() {
        let success = Response::success(Id::Number(1), json!(19));
        assert_eq!(
            serde_json::to_string(&success).unwrap(),
            r#"{"jsonrpc":"2.0","id":1,"result":19}"#
        );

        let error = Response::error(
            Id::from("abc"),
            JsonRpcError::new(ErrorCode::MethodNotFound, "Method not found"),
        );
        assert_eq!(
            serde_json::to_string(&error).unwrap(),
            r#"{"jsonrpc":"2.0","id":"abc","error":{"code":-32601,"message":"Method not found"}}"#
        );
    }

    #[test]
    fn test_null_result_is_still_written() {
        let response = Response::success(Id::Number(7), Value::Null);
        let json_str = serde_json::to_string(&response).unwrap();
        assert!(json_str.contains(r#""result":null"#));
    }

    #[test]
    fn test_message_decode_response() {
        let msg = Message::decode(r#"{"id":"x","result":{"ok":true}}"#).unwrap();
        assert_eq!(msg.id, Some(Id::from("x")));
        assert!(msg.is_response());
        assert!(msg.method.is_none());
    }

    #[test]
    fn test_message_decode_ignores_unusable_id() {
        let msg = Message::decode(r#"{"id":{"nested":1},"method":"ping"}"#).unwrap();
        assert!(msg.id.is_none());
        assert_eq!(msg.method.as_deref(), Some("ping"));

        let msg = Message::decode(r#"{"id":null,"method":"ping"}"#).unwrap();
        assert!(msg.id.is_none());
    }

    #[test]
    fn test_random_ids_are_distinct() {
        let a = Id::random();
        let b = Id::random();
        assert_ne!(a, b);
        assert!(matches!(a, Id::String(_)));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(Id::from("abc").to_string(), "abc");
        assert_eq!(Id::Number(123).to_string(), "123");
    }
}
