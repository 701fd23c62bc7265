// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! MCP servers.
//!
//! [`BaseServer`] binds a dispatcher to a transport and answers the
//! handshake. [`McpServer`] adds the tool, resource and prompt catalogs.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::methods::{
    register_initialize_method, register_prompt_methods, register_resource_methods, register_tool_methods,
};
use super::registry::CapabilityRegistry;
use super::template::ResourceTemplate;
use super::types::{Capabilities, ImplementationInfo, InitializeResult};
use crate::config::server::{ServerConfig, DEFAULT_PROTOCOL_VERSION};
use crate::error::{report_error, ErrorContext, MakaiError, ProtocolError, TransportError};
use crate::protocol::jsonrpc::{JsonRpcHandler, MethodContext, MethodResult, DEFAULT_MAX_MESSAGE_SIZE};
use crate::transport::Transport;

/// A dispatcher bound to at most one transport at a time.
///
/// Every inbound message is handled on its own task and its response is
/// written back from that task, so a slow handler never delays others.
pub struct BaseServer {
    handler: JsonRpcHandler,
    info: InitializeResult,
    transport: Mutex<Option<Arc<dyn Transport>>>,
}

impl BaseServer {
    /// Creates a server advertising `capabilities` with default limits.
    pub fn new(server_info: ImplementationInfo, capabilities: Capabilities) -> Self {
        Self::assemble(
            InitializeResult {
                server_info,
                capabilities,
                protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            },
            DEFAULT_MAX_MESSAGE_SIZE,
        )
    }

    /// Creates a server from configuration.
    pub fn from_config(config: &ServerConfig, capabilities: Capabilities) -> Self {
        Self::assemble(
            InitializeResult {
                server_info: ImplementationInfo::new(&config.name, &config.version),
                capabilities,
                protocol_version: config.protocol_version.clone(),
            },
            config.max_message_size,
        )
    }

    fn assemble(info: InitializeResult, max_message_size: usize) -> Self {
        let handler = JsonRpcHandler::new().with_max_message_size(max_message_size);
        register_initialize_method(&handler, info.clone());
        Self {
            handler,
            info,
            transport: Mutex::new(None),
        }
    }

    /// Binds `method` to `handler`, replacing any existing binding.
    pub fn set_request_handler<F, Fut>(&self, method: impl Into<String>, handler: F)
    where
        F: Send + Sync + 'static + Fn(Value, MethodContext) -> Fut,
        Fut: Future<Output = MethodResult> + Send + 'static,
    {
        self.handler.register_method(method, handler);
    }

    /// The dispatcher, for registering handlers or driving it directly.
    pub fn handler(&self) -> &JsonRpcHandler {
        &self.handler
    }

    /// Identity sent in the handshake.
    pub fn server_info(&self) -> &ImplementationInfo {
        &self.info.server_info
    }

    /// Capabilities sent in the handshake.
    pub fn capabilities(&self) -> &Capabilities {
        &self.info.capabilities
    }

    /// Protocol revision sent in the handshake.
    pub fn protocol_version(&self) -> &str {
        &self.info.protocol_version
    }

    /// True while bound to a transport.
    pub async fn is_connected(&self) -> bool {
        self.transport.lock().await.is_some()
    }

    /// Starts serving on `transport`.
    pub async fn connect(&self, transport: Arc<dyn Transport>) -> Result<(), TransportError> {
        let mut slot = self.transport.lock().await;
        if slot.is_some() {
            return Err(TransportError::AlreadyConnected);
        }

        let handler = self.handler.clone();
        let sink = Arc::downgrade(&transport);
        let runtime = Handle::current();
        transport.on_message(Arc::new(move |text: String| {
            let handler = handler.clone();
            let sink = sink.clone();
            runtime.spawn(async move {
                let Some(reply) = handler.handle_request(text).await else {
                    return;
                };
                let Some(transport) = sink.upgrade() else {
                    debug!("Transport gone, dropping response");
                    return;
                };
                if let Err(err) = transport.send_message(&reply).await {
                    report_error(
                        ErrorContext::new(MakaiError::Transport(err), "server")
                            .with_details("failed to write response"),
                    );
                }
            });
        }));

        transport.connect().await?;
        *slot = Some(transport);
        info!(
            server = %self.info.server_info.name,
            version = %self.info.server_info.version,
            "Server connected"
        );
        Ok(())
    }

    /// Stops serving. A no-op when not connected.
    pub async fn disconnect(&self) -> Result<(), TransportError> {
        let Some(transport) = self.transport.lock().await.take() else {
            return Ok(());
        };
        transport.disconnect().await?;
        info!(server = %self.info.server_info.name, "Server disconnected");
        Ok(())
    }
}

/// A server exposing tool, resource and prompt catalogs.
///
/// ```
/// use makai_mcp_lib::protocol::mcp::{ImplementationInfo, McpServer, ToolResult};
/// use serde_json::json;
///
/// let server = McpServer::new(ImplementationInfo::new("demo", "1.0.0"));
/// server.tool("add", json!({"type": "object"}), |args| async move {
///     let sum = args["a"].as_i64().unwrap_or(0) + args["b"].as_i64().unwrap_or(0);
///     Ok(ToolResult::text(sum.to_string()))
/// });
/// assert_eq!(server.registry().list_tools().tools.len(), 1);
/// ```
pub struct McpServer {
    base: BaseServer,
    registry: CapabilityRegistry,
}

impl McpServer {
    /// Creates a server advertising all three catalogs.
    pub fn new(server_info: ImplementationInfo) -> Self {
        Self::with_base(BaseServer::new(server_info, Capabilities::all()))
    }

    /// Creates a server from configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::with_base(BaseServer::from_config(config, Capabilities::all()))
    }

    fn with_base(base: BaseServer) -> Self {
        let registry = CapabilityRegistry::new();
        register_tool_methods(base.handler(), &registry);
        register_resource_methods(base.handler(), &registry);
        register_prompt_methods(base.handler(), &registry);
        Self { base, registry }
    }

    /// Registers a tool. Its result must serialize to `{content: [...]}`.
    pub fn tool<F, Fut, R>(&self, name: impl Into<String>, input_schema: Value, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
        R: Serialize,
    {
        self.registry.register_tool(name, input_schema, handler);
    }

    /// Registers a resource under `template`. Its result must serialize to
    /// `{contents: [...]}`.
    pub fn resource<F, Fut, R>(&self, name: impl Into<String>, template: &str, handler: F) -> Result<(), ProtocolError>
    where
        F: Fn(String, HashMap<String, String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
        R: Serialize,
    {
        let template = ResourceTemplate::compile(template)?;
        self.registry.register_resource(name, template, handler);
        Ok(())
    }

    /// Registers a resource under an already compiled template.
    pub fn resource_template<F, Fut, R>(&self, name: impl Into<String>, template: ResourceTemplate, handler: F)
    where
        F: Fn(String, HashMap<String, String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
        R: Serialize,
    {
        self.registry.register_resource(name, template, handler);
    }

    /// Registers a prompt. Its result must serialize to `{messages: [...]}`.
    pub fn prompt<F, Fut, R>(&self, name: impl Into<String>, input_schema: Value, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
        R: Serialize,
    {
        self.registry.register_prompt(name, input_schema, handler);
    }

    /// Replaces the handler for any method, including the standard ones.
    pub fn override_request_handler<F, Fut>(&self, method: impl Into<String>, handler: F)
    where
        F: Send + Sync + 'static + Fn(Value, MethodContext) -> Fut,
        Fut: Future<Output = MethodResult> + Send + 'static,
    {
        self.base.set_request_handler(method, handler);
    }

    /// The catalogs.
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// The underlying base server.
    pub fn base(&self) -> &BaseServer {
        &self.base
    }

    /// Identity sent in the handshake.
    pub fn server_info(&self) -> &ImplementationInfo {
        self.base.server_info()
    }

    /// Starts serving on `transport`.
    pub async fn connect(&self, transport: Arc<dyn Transport>) -> Result<(), TransportError> {
        let (tools, resources, prompts) = self.registry.counts();
        debug!(tools, resources, prompts, "Starting MCP server");
        self.base.connect(transport).await
    }

    /// Stops serving.
    pub async fn disconnect(&self) -> Result<(), TransportError> {
        self.base.disconnect().await
    }
}
