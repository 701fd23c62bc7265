// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Payload types exchanged by MCP methods.
//!
//! Field names follow the wire format (`camelCase`). Optional fields are
//! omitted when absent rather than sent as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name and version of one side of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationInfo {
    /// Implementation name
    pub name: String,

    /// Implementation version
    pub version: String,
}

impl ImplementationInfo {
    /// Creates a new implementation record.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Catalogs a party advertises during the handshake.
///
/// Each present entry is an (often empty) options object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Resource catalog options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Value>,

    /// Tool catalog options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Value>,

    /// Prompt catalog options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts: Option<Value>,
}

impl Capabilities {
    /// Advertises all three catalogs with empty options.
    pub fn all() -> Self {
        let empty = || Some(Value::Object(Default::default()));
        Self {
            resources: empty(),
            tools: empty(),
            prompts: empty(),
        }
    }

    /// Advertises nothing.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Parameters of the `initialize` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializeParams {
    /// The connecting client
    pub client: ImplementationInfo,

    /// What the client supports
    #[serde(default)]
    pub capabilities: Capabilities,
}

/// Result of the `initialize` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// The answering server
    pub server_info: ImplementationInfo,

    /// What the server supports
    #[serde(default)]
    pub capabilities: Capabilities,

    /// Protocol revision spoken by the server
    pub protocol_version: String,
}

/// One item of tool output or prompt content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Content kind, e.g. `text`
    #[serde(rename = "type")]
    pub kind: String,

    /// Text payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Structured or encoded payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Content {
    /// Plain text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
            data: None,
        }
    }

    /// Content of an arbitrary kind carrying `data`.
    pub fn data(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            text: None,
            data: Some(data),
        }
    }
}

/// One item returned by `resources/read`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    /// URI the content was read from
    pub uri: String,

    /// MIME type of the content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Text payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Structured or encoded payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ResourceContent {
    /// Text content for `uri` with the given MIME type.
    pub fn text(uri: impl Into<String>, mime_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: Some(mime_type.into()),
            text: Some(text.into()),
            data: None,
        }
    }
}

/// Result of `tools/call`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Output items
    pub content: Vec<Content>,

    /// True when the tool reports a failure in-band
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    /// A successful result with a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: false,
        }
    }

    /// An in-band failure with a single text item.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: true,
        }
    }
}

/// Result of `resources/read`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadResourceResult {
    /// Content items
    pub contents: Vec<ResourceContent>,
}

impl ReadResourceResult {
    /// Wraps a single content item.
    pub fn single(content: ResourceContent) -> Self {
        Self {
            contents: vec![content],
        }
    }
}

/// One message of a rendered prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Speaker role, e.g. `user` or `assistant`
    pub role: String,

    /// Message body
    pub content: Content,
}

impl PromptMessage {
    /// A text message from `role`.
    pub fn text(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Content::text(text),
        }
    }
}

/// Result of `prompts/get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetPromptResult {
    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Rendered messages
    pub messages: Vec<PromptMessage>,
}

/// Listing entry for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    /// Tool name
    pub name: String,

    /// Shape of the accepted arguments
    #[serde(default)]
    pub input_schema: Value,
}

/// Listing entry for a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptInfo {
    /// Prompt name
    pub name: String,

    /// Shape of the accepted arguments
    #[serde(default)]
    pub input_schema: Value,
}

/// Listing entry for a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInfo {
    /// Resource name
    pub name: String,

    /// URI template the resource answers to
    pub template: String,

    /// Capability descriptor of the template
    #[serde(default)]
    pub capabilities: Value,
}

/// Result of `tools/list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListToolsResult {
    /// Registered tools, in registration order
    pub tools: Vec<ToolInfo>,
}

/// Result of `prompts/list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPromptsResult {
    /// Registered prompts, in registration order
    pub prompts: Vec<PromptInfo>,
}

/// Result of `resources/list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResourcesResult {
    /// Registered resources, in registration order
    pub resources: Vec<ResourceInfo>,
}
