// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Unit tests for the JSON-RPC dispatcher.

use std::sync::Arc;

use anyhow::anyhow;
use serde_json::{json, Value};

use crate::protocol::jsonrpc::{
    ErrorCode, Id, JsonRpcHandler, MethodContext, MethodHandlerFn, MethodHandlerFuture,
    MethodHandler,
};

// Helper struct for testing trait-object handlers
struct EchoHandler {
    tag: &'static str,
}

impl MethodHandler for EchoHandler {
    fn handle(&self, params: Value, context: MethodContext) -> MethodHandlerFuture {
        let tag = self.tag;
        Box::pin(async move { Ok(json!({"tag": tag, "method": context.method, "params": params})) })
    }
}

fn add_handler() -> JsonRpcHandler {
    let handler = JsonRpcHandler::new();
    handler.register_method("add", |params: Value, _ctx| async move {
        let a = params.get("a").and_then(Value::as_i64).ok_or_else(|| anyhow!("missing a"))?;
        let b = params.get("b").and_then(Value::as_i64).ok_or_else(|| anyhow!("missing b"))?;
        Ok::<_, anyhow::Error>(json!(a + b))
    });
    handler
}

async fn roundtrip(handler: &JsonRpcHandler, text: &str) -> Option<Value> {
    handler
        .handle_request(text)
        .await
        .map(|s| serde_json::from_str(&s).unwrap())
}

#[tokio::test]
async fn test_handle_valid_request() {
    let handler = add_handler();

    let response = roundtrip(
        &handler,
        r#"{"jsonrpc":"2.0","method":"add","params":{"a":5,"b":3},"id":1}"#,
    )
    .await
    .unwrap();

    assert_eq!(response, json!({"jsonrpc": "2.0", "id": 1, "result": 8}));
}

#[tokio::test]
async fn test_string_id_is_echoed() {
    let handler = add_handler();

    let response = roundtrip(
        &handler,
        r#"{"jsonrpc":"2.0","method":"add","params":{"a":1,"b":1},"id":"req-7"}"#,
    )
    .await
    .unwrap();

    assert_eq!(response["id"], json!("req-7"));
    assert_eq!(response["result"], json!(2));
}

#[tokio::test]
async fn test_method_not_found() {
    let handler = add_handler();

    let response = roundtrip(&handler, r#"{"jsonrpc":"2.0","id":1,"method":"nope"}"#)
        .await
        .unwrap();

    assert_eq!(response["id"], json!(1));
    assert_eq!(response["error"]["code"], json!(ErrorCode::MethodNotFound.code()));
    assert_eq!(response["error"]["message"], json!("Method not found: nope"));
    assert!(response.get("result").is_none());
}

#[tokio::test]
async fn test_handler_error_becomes_server_error() {
    let handler = JsonRpcHandler::new();
    handler.register_method("boom", |_params, _ctx| async move {
        Err::<Value, _>(anyhow!("disk on fire"))
    });

    let response = roundtrip(&handler, r#"{"jsonrpc":"2.0","id":3,"method":"boom"}"#)
        .await
        .unwrap();

    assert_eq!(response["error"]["code"], json!(-32000));
    assert_eq!(response["error"]["message"], json!("Server error: disk on fire"));
}

#[tokio::test]
async fn test_handler_panic_becomes_server_error() {
    let handler = JsonRpcHandler::new();
    handler.register_method("panics", |_params, _ctx| async move {
        if true {
            panic!("unexpected state");
        }
        Ok(Value::Null)
    });

    let response = roundtrip(&handler, r#"{"jsonrpc":"2.0","id":4,"method":"panics"}"#)
        .await
        .unwrap();

    assert_eq!(response["id"], json!(4));
    assert_eq!(response["error"]["code"], json!(-32000));
    let message = response["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Server error:"));
    assert!(message.contains("unexpected state"));
}

#[tokio::test]
async fn test_absent_params_become_empty_object() {
    let handler = JsonRpcHandler::new();
    handler.register_method("echo", |params, _ctx| async move { Ok(params) });

    let response = roundtrip(&handler, r#"{"jsonrpc":"2.0","id":1,"method":"echo"}"#)
        .await
        .unwrap();
    assert_eq!(response["result"], json!({}));

    let response = roundtrip(&handler, r#"{"jsonrpc":"2.0","id":2,"method":"echo","params":null}"#)
        .await
        .unwrap();
    assert_eq!(response["result"], json!({}));

    let response = roundtrip(&handler, r#"{"jsonrpc":"2.0","id":3,"method":"echo","params":[1,2]}"#)
        .await
        .unwrap();
    assert_eq!(response["result"], json!([1, 2]));
}

#[tokio::test]
async fn test_invalid_params_type_with_id() {
    let handler = add_handler();

    let response = roundtrip(&handler, r#"{"jsonrpc":"2.0","id":9,"method":"add","params":5}"#)
        .await
        .unwrap();

    assert_eq!(response["id"], json!(9));
    assert_eq!(response["error"]["code"], json!(-32600));
}

#[tokio::test]
async fn test_missing_method_with_id() {
    let handler = add_handler();

    let response = roundtrip(&handler, r#"{"jsonrpc":"2.0","id":2,"params":{}}"#)
        .await
        .unwrap();

    assert_eq!(response["id"], json!(2));
    assert_eq!(response["error"]["code"], json!(-32600));
}

#[tokio::test]
async fn test_unparseable_message_is_dropped() {
    let handler = add_handler();

    assert!(handler.handle_request("{not json").await.is_none());
    assert!(handler.handle_request("").await.is_none());
    assert!(handler.handle_request("[1,2,3]").await.is_none());
}

#[tokio::test]
async fn test_notification_gets_no_response() {
    let handler = JsonRpcHandler::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    handler.register_method("ping", move |params, _ctx| {
        let tx = tx.clone();
        async move {
            tx.send(params).ok();
            Ok(Value::Null)
        }
    });

    let response = handler
        .handle_request(r#"{"jsonrpc":"2.0","method":"ping","params":{"n":1}}"#)
        .await;
    assert!(response.is_none());
    assert_eq!(rx.recv().await.unwrap(), json!({"n": 1}));

    // Notifications to unknown methods are silently dropped as well.
    assert!(handler
        .handle_request(r#"{"jsonrpc":"2.0","method":"missing"}"#)
        .await
        .is_none());
}

#[tokio::test]
async fn test_inbound_response_is_ignored() {
    let handler = add_handler();

    assert!(handler
        .handle_request(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#)
        .await
        .is_none());
}

#[tokio::test]
async fn test_oversized_message_rejected() {
    let handler = add_handler().with_max_message_size(16);

    let dispatched = handler
        .dispatch(r#"{"jsonrpc":"2.0","id":1,"method":"add","params":{"a":1,"b":2}}"#)
        .await;

    // Size is checked before decoding, so there is no id to reply to.
    assert!(dispatched.is_none());
}

#[tokio::test]
async fn test_register_replaces_existing_method() {
    let handler = JsonRpcHandler::new();
    handler.register_handler("who", Arc::new(EchoHandler { tag: "first" }) as MethodHandlerFn);
    handler.register_handler("who", Arc::new(EchoHandler { tag: "second" }) as MethodHandlerFn);

    let response = handler
        .dispatch(r#"{"jsonrpc":"2.0","id":"a","method":"who","params":{"x":1}}"#)
        .await
        .unwrap();

    assert_eq!(response.id, Id::from("a"));
    assert_eq!(
        response.result.unwrap(),
        json!({"tag": "second", "method": "who", "params": {"x": 1}})
    );
}

#[test]
fn test_method_names_sorted() {
    let handler = JsonRpcHandler::new();
    handler.register_method("zeta", |_p, _c| async move { Ok(Value::Null) });
    handler.register_method("alpha", |_p, _c| async move { Ok(Value::Null) });

    assert!(handler.has_method("zeta"));
    assert!(!handler.has_method("beta"));
    assert_eq!(handler.method_names(), vec!["alpha".to_string(), "zeta".to_string()]);
}

#[tokio::test]
async fn test_context_carries_method_and_id() {
    let handler = JsonRpcHandler::new();
    handler.register_method("ctx", |_params, ctx: MethodContext| async move {
        Ok(json!({"method": ctx.method, "id": ctx.id.map(|id| id.to_string())}))
    });

    let response = handler
        .dispatch(r#"{"jsonrpc":"2.0","id":12,"method":"ctx"}"#)
        .await
        .unwrap();

    assert_eq!(response.result.unwrap(), json!({"method": "ctx", "id": "12"}));
}
