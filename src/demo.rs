//! Demonstration server served by `makai_mcp serve`.
//!
//! Exposes one tool (`add`), one resource (`greeting://{name}`) and one
//! prompt (`greet`).

use serde_json::{json, Value};

use crate::config::ServerConfig;
use crate::error::ProtocolError;
use crate::protocol::mcp::{
    GetPromptResult, McpServer, PromptMessage, ReadResourceResult, ResourceContent, ResourceTemplate, ToolResult,
};

/// Builds the demonstration server.
pub fn demo_server(config: &ServerConfig) -> Result<McpServer, ProtocolError> {
    let server = McpServer::from_config(config);

    server.tool(
        "add",
        json!({
            "type": "object",
            "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
            "required": ["a", "b"]
        }),
        |args: Value| async move {
            let (Some(a), Some(b)) = (args["a"].as_i64(), args["b"].as_i64()) else {
                return Ok(ToolResult::error("Error: `a` and `b` must be integers"));
            };
            Ok(match a.checked_add(b) {
                Some(sum) => ToolResult::text(sum.to_string()),
                None => ToolResult::error("Error: integer overflow"),
            })
        },
    );

    let greeting = ResourceTemplate::compile("greeting://{name}")?.with_capabilities(json!({"list": null}));
    server.resource_template("greeting", greeting, |uri, params| async move {
        let name = params.get("name").map(String::as_str).unwrap_or_default();
        Ok(ReadResourceResult::single(ResourceContent::text(
            uri,
            "text/plain",
            format!("Hello, {name}!"),
        )))
    });

    server.prompt(
        "greet",
        json!({"type": "object", "properties": {"name": {"type": "string"}}}),
        |args: Value| async move {
            let name = args["name"].as_str().unwrap_or("friend").to_string();
            Ok(GetPromptResult {
                description: Some("Greets someone by name".to_string()),
                messages: vec![PromptMessage::text("user", format!("Please greet {name} warmly."))],
            })
        },
    );

    Ok(server)
}
