// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Model Context Protocol layer.
//!
//! Built on the message layer in [`crate::protocol::jsonrpc`]: servers expose
//! tool, resource and prompt catalogs; clients perform the handshake and call
//! them.

pub mod client;
pub mod methods;
pub mod registry;
pub mod server;
pub mod template;
pub mod types;

// Re-exports
pub use client::{ConnectionState, McpClient};
pub use registry::CapabilityRegistry;
pub use server::{BaseServer, McpServer};
pub use template::{ResourceTemplate, TemplateError};
pub use types::{
    Capabilities, Content, GetPromptResult, ImplementationInfo, InitializeParams, InitializeResult,
    ListPromptsResult, ListResourcesResult, ListToolsResult, PromptInfo, PromptMessage, ReadResourceResult,
    ResourceContent, ResourceInfo, ToolInfo, ToolResult,
};
