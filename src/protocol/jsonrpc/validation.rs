// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Inbound message validation.
//!
//! Turns raw transport text into either a dispatchable [`Request`] or a
//! response that the dispatcher should ignore, recovering the message `id`
//! whenever possible so that rejections can still be addressed.

use serde_json::{Map, Value};

use super::error::{Error, Result};
use super::types::{Id, Request, JSONRPC_VERSION};
use crate::error::protocol::ProtocolError;

/// The result of validating one inbound message.
#[derive(Debug, Clone)]
pub enum ValidatedMessage {
    /// A request or notification ready for dispatch. `params` defaults to `{}`.
    Request(Request),

    /// A response (has `result` or `error` but no `method`).
    Response(Option<Id>),
}

impl ValidatedMessage {
    /// Returns the contained request if this is a request.
    pub fn as_request(&self) -> Option<&Request> {
        match self {
            ValidatedMessage::Request(req) => Some(req),
            _ => None,
        }
    }
}

/// Validates one inbound message.
///
/// Performs the following checks in order:
/// - the text is no longer than `max_size` bytes
/// - the text is valid JSON
/// - the JSON is an object
/// - `method` is a non-empty string (or absent on a response)
/// - `params`, if present and not null, is an object or an array
pub fn validate_request(text: &str, max_size: usize) -> Result<ValidatedMessage> {
    if text.len() > max_size {
        return Err(Error::InvalidRequest {
            id: None,
            reason: ProtocolError::MessageTooLarge {
                size: text.len(),
                max_size,
            }
            .to_string(),
        });
    }

    let json: Value = serde_json::from_str(text)?;

    let obj = match json {
        Value::Object(obj) => obj,
        _ => {
            return Err(Error::InvalidRequest {
                id: None,
                reason: "message must be a JSON object".to_string(),
            })
        }
    };

    let id = obj.get("id").and_then(Id::from_value);

    let method = match obj.get("method") {
        Some(Value::String(method)) if !method.is_empty() => method.clone(),
        Some(Value::String(_)) => {
            return Err(Error::InvalidRequest {
                id,
                reason: "method cannot be empty".to_string(),
            })
        }
        None if is_response(&obj) => return Ok(ValidatedMessage::Response(id)),
        _ => {
            return Err(Error::InvalidRequest {
                id,
                reason: "method must be a string".to_string(),
            })
        }
    };

    let params = match obj.get("params") {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(params @ (Value::Object(_) | Value::Array(_))) => params.clone(),
        Some(_) => {
            return Err(Error::InvalidRequest {
                id,
                reason: "params must be an object or array".to_string(),
            })
        }
    };

    Ok(ValidatedMessage::Request(Request {
        jsonrpc: JSONRPC_VERSION.to_string(),
        method,
        params: Some(params),
        id,
    }))
}

fn is_response(obj: &Map<String, Value>) -> bool {
    obj.contains_key("result") || obj.contains_key("error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MAX: usize = 1024;

    #[test]
    fn test_validate_valid_request() {
        let text = r#"{"jsonrpc": "2.0", "method": "tools/call", "params": {"name": "add"}, "id": "1"}"#;
        let validated = validate_request(text, MAX).unwrap();
        let request = validated.as_request().unwrap();
        assert_eq!(request.method, "tools/call");
        assert_eq!(request.id, Some(Id::from("1")));
        assert_eq!(request.params, Some(json!({"name": "add"})));
    }

    #[test]
    fn test_missing_params_default_to_empty_object() {
        let validated = validate_request(r#"{"method": "tools/list", "id": 2}"#, MAX).unwrap();
        let request = validated.as_request().unwrap();
        assert_eq!(request.params, Some(json!({})));
        assert_eq!(request.id, Some(Id::Number(2)));
    }

    #[test]
    fn test_validate_notification() {
        let validated = validate_request(r#"{"method": "notifications/initialized"}"#, MAX).unwrap();
        assert!(validated.as_request().unwrap().is_notification());
    }

    #[test]
    fn test_response_is_recognised() {
        let validated = validate_request(r#"{"id": "9", "result": {}}"#, MAX).unwrap();
        assert!(matches!(validated, ValidatedMessage::Response(Some(Id::String(ref s))) if s == "9"));
    }

    #[test]
    fn test_non_string_method_keeps_id() {
        let err = validate_request(r#"{"method": 42, "id": "abc"}"#, MAX).unwrap_err();
        match err {
            Error::InvalidRequest { id, reason } => {
                assert_eq!(id, Some(Id::from("abc")));
                assert!(reason.contains("method must be a string"));
            }
            e => panic!("Expected InvalidRequest, got {:?}", e),
        }
    }

    #[test]
    fn test_missing_method_keeps_id() {
        let err = validate_request(r#"{"id": 5, "params": {}}"#, MAX).unwrap_err();
        assert_eq!(err.id(), Some(&Id::Number(5)));
        assert_eq!(err.to_jsonrpc_error().code, -32600);
    }

    #[test]
    fn test_empty_method() {
        let err = validate_request(r#"{"method": "", "id": 1}"#, MAX).unwrap_err();
        assert!(err.to_string().contains("method cannot be empty"));
    }

    #[test]
    fn test_scalar_params_rejected() {
        let err = validate_request(r#"{"method": "x", "params": "nope", "id": 1}"#, MAX).unwrap_err();
        assert!(err.to_string().contains("params must be"));
    }

    #[test]
    fn test_invalid_json() {
        let err = validate_request(r#"{"method": "test", "params": [1, 2,"#, MAX).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.id().is_none());
    }

    #[test]
    fn test_non_object_rejected() {
        for text in ["42", "[]", r#"[{"method":"a"}]"#, "\"hi\""] {
            let err = validate_request(text, MAX).unwrap_err();
            assert!(matches!(err, Error::InvalidRequest { id: None, .. }), "{text}");
        }
    }

    #[test]
    fn test_oversized_message_rejected() {
        let text = format!(r#"{{"method": "echo", "params": {{"blob": "{}"}}, "id": 1}}"#, "x".repeat(64));
        let err = validate_request(&text, 32).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
        assert!(err.id().is_none());
    }
}
