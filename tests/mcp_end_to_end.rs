// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! End-to-end tests driving an MCP server and client over in-memory transports.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::{mpsc, Notify};

use makai_mcp_lib::config::ServerConfig;
use makai_mcp_lib::demo::demo_server;
use makai_mcp_lib::error::ClientError;
use makai_mcp_lib::protocol::mcp::{
    Capabilities, ConnectionState, ImplementationInfo, McpClient, McpServer, ReadResourceResult, ResourceContent,
    ToolResult,
};
use makai_mcp_lib::transport::{MemoryTransport, Transport};

async fn connect(server: &McpServer) -> McpClient {
    let (client_end, server_end) = MemoryTransport::pair();
    server.connect(Arc::new(server_end)).await.unwrap();

    let client = McpClient::new(ImplementationInfo::new("e2e-client", "1.0.0"), Capabilities::none());
    client.connect(Arc::new(client_end)).await.unwrap();
    client
}

fn files_server() -> McpServer {
    let server = McpServer::new(ImplementationInfo::new("files", "0.3.0"));
    server
        .resource("file", "file:///{dir}/{name}", |uri, params| async move {
            Ok(ReadResourceResult::single(ResourceContent::text(
                uri,
                "text/plain",
                format!("{} in {}", params["name"], params["dir"]),
            )))
        })
        .unwrap();
    server
        .resource("readme", "file:///README", |uri, _params| async move {
            Ok(ReadResourceResult::single(ResourceContent::text(uri, "text/markdown", "# readme")))
        })
        .unwrap();
    server
}

#[tokio::test]
async fn test_demo_session() {
    let server = demo_server(&ServerConfig::default()).unwrap();
    let client = connect(&server).await;

    let tools = client.list_tools().await.unwrap();
    assert_eq!(tools.tools[0].name, "add");

    let result = client.call_tool("add", json!({"a": 5, "b": 7})).await.unwrap();
    assert_eq!(result.content[0].text.as_deref(), Some("12"));

    let result = client.read_resource("greeting://World").await.unwrap();
    assert_eq!(result.contents[0].text.as_deref(), Some("Hello, World!"));

    client.disconnect().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_template_routing() {
    let server = files_server();
    let client = connect(&server).await;

    let result = client.read_resource("file:///docs/intro.md").await.unwrap();
    assert_eq!(result.contents[0].text.as_deref(), Some("intro.md in docs"));
    assert_eq!(result.contents[0].mime_type.as_deref(), Some("text/plain"));

    let result = client.read_resource("file:///README").await.unwrap();
    assert_eq!(result.contents[0].text.as_deref(), Some("# readme"));

    // Parameters never span a path separator.
    let err = client.read_resource("file:///a/b/c").await.unwrap_err();
    assert!(err.to_string().contains("Resource not found: file:///a/b/c"));
}

#[tokio::test]
async fn test_handler_failures_become_errors() {
    let server = McpServer::new(ImplementationInfo::new("faulty", "0.0.1"));
    server.tool("fail", json!({"type": "object"}), |_args: Value| async move {
        Err::<ToolResult, _>(anyhow::anyhow!("database unreachable"))
    });
    server.tool("explode", json!({"type": "object"}), |_args: Value| async move {
        if true {
            panic!("kaboom");
        }
        Ok(ToolResult::text("unreachable"))
    });
    server.tool("soft", json!({"type": "object"}), |_args: Value| async move {
        Ok(ToolResult::error("bad input"))
    });
    let client = connect(&server).await;

    let err = client.call_tool("fail", json!({})).await.unwrap_err();
    match err {
        ClientError::Remote { code, message, .. } => {
            assert_eq!(code, -32000);
            assert_eq!(message, "Server error: database unreachable");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client.call_tool("explode", json!({})).await.unwrap_err();
    assert!(err.to_string().contains("kaboom"));

    let result = client.call_tool("soft", json!({})).await.unwrap();
    assert!(result.is_error);

    // The server keeps serving after a panic.
    assert_eq!(client.list_tools().await.unwrap().tools.len(), 3);
}

#[tokio::test]
async fn test_concurrent_requests_resolve_independently() {
    let server = McpServer::new(ImplementationInfo::new("slow", "0.0.1"));
    let gate = Arc::new(Notify::new());
    let release = gate.clone();
    server.tool("slow", json!({"type": "object"}), move |_args: Value| {
        let gate = gate.clone();
        async move {
            gate.notified().await;
            Ok(ToolResult::text("slow"))
        }
    });
    server.tool("fast", json!({"type": "object"}), |_args: Value| async move {
        Ok(ToolResult::text("fast"))
    });
    let client = Arc::new(connect(&server).await);

    let slow = tokio::spawn({
        let client = client.clone();
        async move { client.call_tool("slow", json!({})).await }
    });

    let fast = client.call_tool("fast", json!({})).await.unwrap();
    assert_eq!(fast.content[0].text.as_deref(), Some("fast"));
    assert!(!slow.is_finished());

    release.notify_one();
    let slow = slow.await.unwrap().unwrap();
    assert_eq!(slow.content[0].text.as_deref(), Some("slow"));
    assert_eq!(client.pending_requests(), 0);
}

#[tokio::test]
async fn test_request_timeout_and_disconnect() {
    let server = McpServer::new(ImplementationInfo::new("stuck", "0.0.1"));
    server.tool("hang", json!({"type": "object"}), |_args: Value| async move {
        std::future::pending::<()>().await;
        Ok(ToolResult::text("never"))
    });
    let client = Arc::new(connect(&server).await);

    let err = client
        .send("tools/call", json!({"name": "hang"}), Some(Duration::from_millis(50)))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(client.pending_requests(), 0);

    let in_flight = tokio::spawn({
        let client = client.clone();
        async move { client.call_tool("hang", json!({})).await }
    });
    while client.pending_requests() == 0 {
        tokio::task::yield_now().await;
    }

    client.disconnect().await.unwrap();
    let err = in_flight.await.unwrap().unwrap_err();
    assert!(matches!(err, ClientError::ConnectionClosed));
    assert!(matches!(client.list_tools().await.unwrap_err(), ClientError::NotConnected));
}

#[tokio::test]
async fn test_raw_peer_survives_garbage() {
    let server = demo_server(&ServerConfig::default()).unwrap();
    let (peer, server_end) = MemoryTransport::pair();
    server.connect(Arc::new(server_end)).await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    peer.on_message(Arc::new(move |text: String| {
        let _ = tx.send(text);
    }));
    peer.connect().await.unwrap();

    peer.send_message("this is not json").await.unwrap();
    peer.send_message(r#"{"jsonrpc":"2.0","method":"tools/list"}"#).await.unwrap();
    peer.send_message(r#"{"jsonrpc":"2.0","id":1,"params":{}}"#).await.unwrap();
    peer.send_message(r#"{"jsonrpc":"2.0","id":"list","method":"tools/list"}"#)
        .await
        .unwrap();

    let mut replies = Vec::new();
    for _ in 0..2 {
        let text = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        replies.push(serde_json::from_str::<Value>(&text).unwrap());
    }
    let reply_to = |id: Value| replies.iter().find(|reply| reply["id"] == id).unwrap();

    // The request without a method is answered with its id; garbage and the notification are not.
    assert_eq!(reply_to(json!(1))["error"]["code"], json!(-32600));
    assert_eq!(reply_to(json!("list"))["result"]["tools"][0]["name"], json!("add"));
}
