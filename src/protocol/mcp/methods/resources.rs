// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! `resources/list` and `resources/read`.

use anyhow::anyhow;
use serde_json::Value;
use tracing::debug;

use super::{listing, require_list, required_str, RESOURCES_LIST, RESOURCES_READ};
use crate::protocol::jsonrpc::handler::{JsonRpcHandler, MethodResult};
use crate::protocol::mcp::registry::CapabilityRegistry;

/// Binds the resource methods to `registry`.
pub fn register_resource_methods(handler: &JsonRpcHandler, registry: &CapabilityRegistry) {
    let reg = registry.clone();
    handler.register_method(RESOURCES_LIST, move |_params, _ctx| {
        let reg = reg.clone();
        async move { listing(reg.list_resources(), RESOURCES_LIST) }
    });

    let reg = registry.clone();
    handler.register_method(RESOURCES_READ, move |params, _ctx| {
        let reg = reg.clone();
        async move { read_resource(&reg, params).await }
    });
}

/// Resolves `uri` against the registered templates in registration order and
/// reads from the first match. The result must hold a `contents` list.
pub async fn read_resource(registry: &CapabilityRegistry, params: Value) -> MethodResult {
    let uri = required_str(&params, "uri")?;
    let (entry, captured) = registry
        .resolve(uri)
        .ok_or_else(|| anyhow!("Resource not found: {uri}"))?;

    debug!(uri = %uri, resource = %entry.name, "Reading resource");
    let result = entry.read(uri.to_string(), captured).await?;

    Ok(Value::Object(require_list(result, "contents", "Resource")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::mcp::template::ResourceTemplate;
    use crate::protocol::mcp::types::{ReadResourceResult, ResourceContent};
    use serde_json::json;

    fn registry() -> CapabilityRegistry {
        let registry = CapabilityRegistry::new();
        registry.register_resource(
            "greeting",
            ResourceTemplate::compile("greeting://{name}").unwrap(),
            |uri, params| async move {
                let text = format!("Hello, {}!", params["name"]);
                Ok(ReadResourceResult::single(ResourceContent::text(uri, "text/plain", text)))
            },
        );
        registry.register_resource(
            "broken",
            ResourceTemplate::compile("broken://{x}").unwrap(),
            |_uri, _params| async move { Ok(json!({"contents": {}})) },
        );
        registry
    }

    #[tokio::test]
    async fn test_read_resource() {
        let result = read_resource(&registry(), json!({"uri": "greeting://Alice"})).await.unwrap();
        assert_eq!(
            result,
            json!({"contents": [{"uri": "greeting://Alice", "mimeType": "text/plain", "text": "Hello, Alice!"}]})
        );
    }

    #[tokio::test]
    async fn test_resource_not_found() {
        let err = read_resource(&registry(), json!({"uri": "greeting://a/b"})).await.unwrap_err();
        assert_eq!(err.to_string(), "Resource not found: greeting://a/b");

        let err = read_resource(&registry(), json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "missing required parameter: uri");
    }

    #[tokio::test]
    async fn test_contract_violation() {
        let err = read_resource(&registry(), json!({"uri": "broken://1"})).await.unwrap_err();
        assert_eq!(err.to_string(), "Resource handler must return { contents: [...] }");
    }
}
