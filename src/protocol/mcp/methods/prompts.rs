// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! `prompts/list` and `prompts/get`.

use anyhow::anyhow;
use serde_json::Value;
use tracing::debug;

use super::{arguments, listing, require_list, required_str, PROMPTS_GET, PROMPTS_LIST};
use crate::protocol::jsonrpc::handler::{JsonRpcHandler, MethodResult};
use crate::protocol::mcp::registry::CapabilityRegistry;

/// Binds the prompt methods to `registry`.
pub fn register_prompt_methods(handler: &JsonRpcHandler, registry: &CapabilityRegistry) {
    let reg = registry.clone();
    handler.register_method(PROMPTS_LIST, move |_params, _ctx| {
        let reg = reg.clone();
        async move { listing(reg.list_prompts(), PROMPTS_LIST) }
    });

    let reg = registry.clone();
    handler.register_method(PROMPTS_GET, move |params, _ctx| {
        let reg = reg.clone();
        async move { get_prompt(&reg, params).await }
    });
}

/// Renders the named prompt. The result must hold a `messages` list.
pub async fn get_prompt(registry: &CapabilityRegistry, params: Value) -> MethodResult {
    let name = required_str(&params, "name")?;
    let prompt = registry
        .prompt(name)
        .ok_or_else(|| anyhow!("Prompt not found: {name}"))?;

    debug!(prompt = %name, "Rendering prompt");
    let result = prompt.render(arguments(&params)).await?;

    Ok(Value::Object(require_list(result, "messages", "Prompt")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::mcp::types::{GetPromptResult, PromptMessage};
    use serde_json::json;

    #[tokio::test]
    async fn test_get_prompt() {
        let registry = CapabilityRegistry::new();
        registry.register_prompt("greet", json!({}), |args: Value| async move {
            let name = args["name"].as_str().unwrap_or("there").to_string();
            Ok(GetPromptResult {
                description: None,
                messages: vec![PromptMessage::text("user", format!("Say hello to {name}"))],
            })
        });

        let result = get_prompt(&registry, json!({"name": "greet"})).await.unwrap();
        assert_eq!(result["messages"][0]["content"]["text"], json!("Say hello to there"));

        let err = get_prompt(&registry, json!({"name": "other"})).await.unwrap_err();
        assert_eq!(err.to_string(), "Prompt not found: other");
    }

    #[tokio::test]
    async fn test_contract_violation() {
        let registry = CapabilityRegistry::new();
        registry.register_prompt("bad", json!({}), |_args| async move { Ok(json!({"msgs": []})) });

        let err = get_prompt(&registry, json!({"name": "bad"})).await.unwrap_err();
        assert_eq!(err.to_string(), "Prompt handler must return { messages: [...] }");
    }
}
