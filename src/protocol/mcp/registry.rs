// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Tool, resource and prompt catalogs.
//!
//! Catalogs are keyed by name and keep registration order. Re-registering a
//! name replaces the entry in place. Resource lookup walks the catalog in
//! registration order and the first template that matches wins.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::template::ResourceTemplate;
use super::types::{
    ListPromptsResult, ListResourcesResult, ListToolsResult, PromptInfo, ResourceInfo, ToolInfo,
};

/// Type-erased handler for tools and prompts: arguments in, raw result out.
pub type ArgumentsHandlerFn = Arc<dyn Fn(Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// Type-erased handler for resources: requested URI and captured parameters
/// in, raw result out.
pub type ResourceHandlerFn =
    Arc<dyn Fn(String, HashMap<String, String>) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// A registered tool.
pub struct ToolEntry {
    /// Tool name
    pub name: String,
    /// Shape of the accepted arguments
    pub input_schema: Value,
    handler: ArgumentsHandlerFn,
}

impl ToolEntry {
    /// Invokes the tool with `arguments`.
    pub fn call(&self, arguments: Value) -> BoxFuture<'static, anyhow::Result<Value>> {
        (self.handler)(arguments)
    }
}

/// A registered prompt.
pub struct PromptEntry {
    /// Prompt name
    pub name: String,
    /// Shape of the accepted arguments
    pub input_schema: Value,
    handler: ArgumentsHandlerFn,
}

impl PromptEntry {
    /// Renders the prompt with `arguments`.
    pub fn render(&self, arguments: Value) -> BoxFuture<'static, anyhow::Result<Value>> {
        (self.handler)(arguments)
    }
}

/// A registered resource.
pub struct ResourceEntry {
    /// Resource name
    pub name: String,
    /// Compiled URI template
    pub template: ResourceTemplate,
    handler: ResourceHandlerFn,
}

impl ResourceEntry {
    /// Reads the resource at `uri` with the parameters captured from it.
    pub fn read(&self, uri: String, params: HashMap<String, String>) -> BoxFuture<'static, anyhow::Result<Value>> {
        (self.handler)(uri, params)
    }
}

/// Shared catalogs. Clones see the same entries.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    tools: Arc<RwLock<IndexMap<String, Arc<ToolEntry>>>>,
    resources: Arc<RwLock<IndexMap<String, Arc<ResourceEntry>>>>,
    prompts: Arc<RwLock<IndexMap<String, Arc<PromptEntry>>>>,
}

fn erase_arguments_handler<F, Fut, R>(handler: F) -> ArgumentsHandlerFn
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    R: Serialize,
{
    Arc::new(move |arguments| {
        let fut = handler(arguments);
        async move {
            let value = fut.await?;
            Ok::<_, anyhow::Error>(serde_json::to_value(value)?)
        }
        .boxed()
    })
}

impl CapabilityRegistry {
    /// Creates empty catalogs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool. The handler may return any serializable value; it is
    /// checked against the `tools/call` result contract when called.
    pub fn register_tool<F, Fut, R>(&self, name: impl Into<String>, input_schema: Value, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
        R: Serialize,
    {
        let name = name.into();
        debug!(tool = %name, "Registering tool");
        let entry = ToolEntry {
            name: name.clone(),
            input_schema,
            handler: erase_arguments_handler(handler),
        };
        self.tools.write().insert(name, Arc::new(entry));
    }

    /// Registers a resource under a compiled template.
    pub fn register_resource<F, Fut, R>(&self, name: impl Into<String>, template: ResourceTemplate, handler: F)
    where
        F: Fn(String, HashMap<String, String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
        R: Serialize,
    {
        let name = name.into();
        debug!(resource = %name, template = %template, "Registering resource");
        let handler: ResourceHandlerFn = Arc::new(move |uri, params| {
            let fut = handler(uri, params);
            async move {
                let value = fut.await?;
                Ok::<_, anyhow::Error>(serde_json::to_value(value)?)
            }
            .boxed()
        });
        let entry = ResourceEntry {
            name: name.clone(),
            template,
            handler,
        };
        self.resources.write().insert(name, Arc::new(entry));
    }

    /// Registers a prompt.
    pub fn register_prompt<F, Fut, R>(&self, name: impl Into<String>, input_schema: Value, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
        R: Serialize,
    {
        let name = name.into();
        debug!(prompt = %name, "Registering prompt");
        let entry = PromptEntry {
            name: name.clone(),
            input_schema,
            handler: erase_arguments_handler(handler),
        };
        self.prompts.write().insert(name, Arc::new(entry));
    }

    /// Looks up a tool by name.
    pub fn tool(&self, name: &str) -> Option<Arc<ToolEntry>> {
        self.tools.read().get(name).cloned()
    }

    /// Looks up a prompt by name.
    pub fn prompt(&self, name: &str) -> Option<Arc<PromptEntry>> {
        self.prompts.read().get(name).cloned()
    }

    /// Finds the first resource, in registration order, whose template
    /// matches `uri`.
    pub fn resolve(&self, uri: &str) -> Option<(Arc<ResourceEntry>, HashMap<String, String>)> {
        self.resources
            .read()
            .values()
            .find_map(|entry| entry.template.match_uri(uri).map(|params| (entry.clone(), params)))
    }

    /// Tool listing in registration order.
    pub fn list_tools(&self) -> ListToolsResult {
        ListToolsResult {
            tools: self
                .tools
                .read()
                .values()
                .map(|t| ToolInfo {
                    name: t.name.clone(),
                    input_schema: t.input_schema.clone(),
                })
                .collect(),
        }
    }

    /// Resource listing in registration order.
    pub fn list_resources(&self) -> ListResourcesResult {
        ListResourcesResult {
            resources: self
                .resources
                .read()
                .values()
                .map(|r| ResourceInfo {
                    name: r.name.clone(),
                    template: r.template.as_str().to_string(),
                    capabilities: r.template.capabilities().clone(),
                })
                .collect(),
        }
    }

    /// Prompt listing in registration order.
    pub fn list_prompts(&self) -> ListPromptsResult {
        ListPromptsResult {
            prompts: self
                .prompts
                .read()
                .values()
                .map(|p| PromptInfo {
                    name: p.name.clone(),
                    input_schema: p.input_schema.clone(),
                })
                .collect(),
        }
    }

    /// Number of registered tools, resources and prompts.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.tools.read().len(), self.resources.read().len(), self.prompts.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::mcp::types::ToolResult;
    use serde_json::json;

    fn template(s: &str) -> ResourceTemplate {
        ResourceTemplate::compile(s).unwrap()
    }

    #[test]
    fn test_reregistering_replaces_in_place() {
        let registry = CapabilityRegistry::new();
        registry.register_tool("a", json!({"v": 1}), |_| async { Ok(ToolResult::text("a")) });
        registry.register_tool("b", json!({}), |_| async { Ok(ToolResult::text("b")) });
        registry.register_tool("a", json!({"v": 2}), |_| async { Ok(ToolResult::text("a2")) });

        let listing = registry.list_tools();
        let names: Vec<_> = listing.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(listing.tools[0].input_schema, json!({"v": 2}));
    }

    #[test]
    fn test_first_matching_template_wins() {
        let registry = CapabilityRegistry::new();
        registry.register_resource("by-id", template("db://{table}/{id}"), |_, _| async { Ok(json!(1)) });
        registry.register_resource("by-key", template("db://{bucket}/{key}"), |_, _| async { Ok(json!(2)) });

        let (entry, params) = registry.resolve("db://users/7").unwrap();
        assert_eq!(entry.name, "by-id");
        assert_eq!(params["table"], "users");
        assert!(registry.resolve("file://users/7").is_none());
    }

    #[test]
    fn test_schema_and_record_templates() {
        let registry = CapabilityRegistry::new();
        registry.register_resource("schema", template("res://{id}/schema"), |_, _| async { Ok(json!(1)) });
        registry.register_resource("record", template("res://{id}"), |_, _| async { Ok(json!(2)) });

        let (entry, params) = registry.resolve("res://42/schema").unwrap();
        assert_eq!(entry.name, "schema");
        assert_eq!(params["id"], "42");

        let (entry, _) = registry.resolve("res://42").unwrap();
        assert_eq!(entry.name, "record");
    }

    #[tokio::test]
    async fn test_handlers_serialize_their_output() {
        let registry = CapabilityRegistry::new();
        registry.register_tool("echo", json!({}), |args| async move { Ok(ToolResult::text(args.to_string())) });

        let tool = registry.tool("echo").unwrap();
        let value = tool.call(json!({"x": 1})).await.unwrap();
        assert_eq!(value, json!({"content": [{"type": "text", "text": "{\"x\":1}"}], "isError": false}));
        assert_eq!(registry.counts(), (1, 0, 0));
    }
}
