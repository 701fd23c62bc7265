// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The `initialize` handshake method.
//!
//! The first request a client sends. The server answers with its identity,
//! its capabilities and the protocol revision; client parameters are only
//! logged.

use serde_json::Value;
use tracing::{debug, info};

use super::INITIALIZE;
use crate::protocol::jsonrpc::handler::{JsonRpcHandler, MethodContext, MethodResult};
use crate::protocol::mcp::types::{InitializeParams, InitializeResult};

/// Binds `initialize` to answer with `result`.
pub fn register_initialize_method(handler: &JsonRpcHandler, result: InitializeResult) {
    handler.register_method(INITIALIZE, move |params, context| {
        let result = result.clone();
        async move { handle_initialize(params, context, result) }
    });
}

fn handle_initialize(params: Value, _context: MethodContext, result: InitializeResult) -> MethodResult {
    match serde_json::from_value::<InitializeParams>(params) {
        Ok(params) => info!(
            client = %params.client.name,
            client_version = %params.client.version,
            "Client initializing"
        ),
        Err(err) => debug!(error = %err, "Initialize without client info"),
    }

    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::mcp::types::{Capabilities, ImplementationInfo};
    use serde_json::json;

    #[tokio::test]
    async fn test_initialize_ignores_params_shape() {
        let handler = JsonRpcHandler::new();
        register_initialize_method(
            &handler,
            InitializeResult {
                server_info: ImplementationInfo::new("srv", "0.1.0"),
                capabilities: Capabilities::all(),
                protocol_version: "2024-11-05".to_string(),
            },
        );

        for params in [json!({}), json!({"client": {"name": "c", "version": "1"}}), json!([1])] {
            let text = json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": params}).to_string();
            let response = handler.dispatch(&text).await.unwrap();
            let result = response.result.unwrap();
            assert_eq!(result["serverInfo"]["name"], json!("srv"));
            assert_eq!(result["protocolVersion"], json!("2024-11-05"));
        }
    }
}
