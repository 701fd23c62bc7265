// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Standard MCP method handlers.
//!
//! Each submodule binds one family of methods onto a [`JsonRpcHandler`].
//!
//! [`JsonRpcHandler`]: crate::protocol::jsonrpc::JsonRpcHandler

pub mod initialize;
pub mod prompts;
pub mod resources;
pub mod tools;

use anyhow::{anyhow, Context};
use serde_json::{Map, Value};

// Re-exports
pub use initialize::register_initialize_method;
pub use prompts::register_prompt_methods;
pub use resources::register_resource_methods;
pub use tools::register_tool_methods;

/// Handshake method.
pub const INITIALIZE: &str = "initialize";
/// Tool listing.
pub const TOOLS_LIST: &str = "tools/list";
/// Tool invocation.
pub const TOOLS_CALL: &str = "tools/call";
/// Resource listing.
pub const RESOURCES_LIST: &str = "resources/list";
/// Resource read.
pub const RESOURCES_READ: &str = "resources/read";
/// Prompt listing.
pub const PROMPTS_LIST: &str = "prompts/list";
/// Prompt rendering.
pub const PROMPTS_GET: &str = "prompts/get";

/// Reads a required string field from request parameters.
pub(crate) fn required_str<'a>(params: &'a Value, field: &str) -> anyhow::Result<&'a str> {
    params
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("missing required parameter: {field}"))
}

/// Reads the optional `arguments` object, defaulting to `{}`.
pub(crate) fn arguments(params: &Value) -> Value {
    match params.get("arguments") {
        Some(Value::Null) | None => Value::Object(Map::new()),
        Some(args) => args.clone(),
    }
}

/// Checks that a handler result is an object holding a list under `field`.
pub(crate) fn require_list(result: Value, field: &str, what: &str) -> anyhow::Result<Map<String, Value>> {
    let map = match result {
        Value::Object(map) if map.get(field).is_some_and(Value::is_array) => map,
        _ => return Err(anyhow!("{what} handler must return {{ {field}: [...] }}")),
    };
    Ok(map)
}

/// Serializes a listing result.
pub(crate) fn listing<T: serde::Serialize>(result: T, method: &str) -> anyhow::Result<Value> {
    serde_json::to_value(result).with_context(|| format!("failed to encode {method} result"))
}
