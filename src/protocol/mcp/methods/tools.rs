// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! `tools/list` and `tools/call`.

use anyhow::anyhow;
use serde_json::Value;
use tracing::debug;

use super::{arguments, listing, require_list, required_str, TOOLS_CALL, TOOLS_LIST};
use crate::protocol::jsonrpc::handler::{JsonRpcHandler, MethodResult};
use crate::protocol::mcp::registry::CapabilityRegistry;

/// Binds the tool methods to `registry`.
pub fn register_tool_methods(handler: &JsonRpcHandler, registry: &CapabilityRegistry) {
    let reg = registry.clone();
    handler.register_method(TOOLS_LIST, move |_params, _ctx| {
        let reg = reg.clone();
        async move { listing(reg.list_tools(), TOOLS_LIST) }
    });

    let reg = registry.clone();
    handler.register_method(TOOLS_CALL, move |params, _ctx| {
        let reg = reg.clone();
        async move { call_tool(&reg, params).await }
    });
}

/// Looks up the named tool, runs it and checks its result.
///
/// The result must be an object with a `content` list; `isError` is forced
/// to a boolean.
pub async fn call_tool(registry: &CapabilityRegistry, params: Value) -> MethodResult {
    let name = required_str(&params, "name")?;
    let tool = registry
        .tool(name)
        .ok_or_else(|| anyhow!("Tool not found: {name}"))?;

    debug!(tool = %name, "Calling tool");
    let result = tool.call(arguments(&params)).await?;

    let mut result = require_list(result, "content", "Tool")?;
    let is_error = match result.get("isError") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Null) | None => false,
        Some(_) => true,
    };
    result.insert("isError".to_string(), Value::Bool(is_error));
    Ok(Value::Object(result))
}
