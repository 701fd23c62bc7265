// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! MCP client.
//!
//! The client owns a correlator. Every call registers a waiter under a fresh
//! id before the request is written, then waits for the matching response or
//! its own timeout. Calls may be issued concurrently from many tasks.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, trace, warn};

use super::methods::{INITIALIZE, PROMPTS_GET, PROMPTS_LIST, RESOURCES_LIST, RESOURCES_READ, TOOLS_CALL, TOOLS_LIST};
use super::types::{
    Capabilities, GetPromptResult, ImplementationInfo, InitializeParams, InitializeResult, ListPromptsResult,
    ListResourcesResult, ListToolsResult, ReadResourceResult, ToolResult,
};
use crate::config::client::ClientConfig;
use crate::error::ClientError;
use crate::protocol::jsonrpc::{CorrelationError, Id, Message, Request, RequestResponseCorrelator};
use crate::transport::Transport;

/// Connection lifecycle of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport bound.
    Disconnected,
    /// Transport bound, handshake in flight.
    Connecting,
    /// Handshake complete.
    Connected,
}

#[derive(Debug)]
struct Lifecycle {
    state: ConnectionState,
    /// Bumped by every `connect`, so a stale handshake can tell it was superseded.
    session: u64,
}

impl Lifecycle {
    fn is_handshaking(&self, session: u64) -> bool {
        self.state == ConnectionState::Connecting && self.session == session
    }
}

/// Requesting side of an MCP connection.
pub struct McpClient {
    client_info: ImplementationInfo,
    capabilities: Capabilities,
    correlator: RequestResponseCorrelator,
    handshake_timeout: Duration,
    lifecycle: RwLock<Lifecycle>,
    transport: RwLock<Option<Arc<dyn Transport>>>,
    server: RwLock<Option<InitializeResult>>,
}

impl McpClient {
    /// Creates a disconnected client with default timeouts.
    pub fn new(client_info: ImplementationInfo, capabilities: Capabilities) -> Self {
        Self::build(client_info, capabilities, &ClientConfig::default())
    }

    /// Creates a disconnected client from configuration.
    pub fn with_config(config: &ClientConfig, capabilities: Capabilities) -> Self {
        Self::build(
            ImplementationInfo::new(&config.name, &config.version),
            capabilities,
            config,
        )
    }

    fn build(client_info: ImplementationInfo, capabilities: Capabilities, config: &ClientConfig) -> Self {
        Self {
            client_info,
            capabilities,
            correlator: RequestResponseCorrelator::new().with_default_timeout(config.request_timeout()),
            handshake_timeout: config.handshake_timeout(),
            lifecycle: RwLock::new(Lifecycle {
                state: ConnectionState::Disconnected,
                session: 0,
            }),
            transport: RwLock::new(None),
            server: RwLock::new(None),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.lifecycle.read().state
    }

    /// True once the handshake has completed.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// What the server reported during the handshake.
    pub fn server_info(&self) -> Option<InitializeResult> {
        self.server.read().clone()
    }

    /// Number of requests awaiting a response.
    pub fn pending_requests(&self) -> usize {
        self.correlator.pending_count()
    }

    /// Binds `transport`, connects it and performs the handshake.
    ///
    /// On any failure the transport is disconnected and the client returns to
    /// [`ConnectionState::Disconnected`].
    pub async fn connect(&self, transport: Arc<dyn Transport>) -> Result<InitializeResult, ClientError> {
        let session = {
            let mut lifecycle = self.lifecycle.write();
            if lifecycle.state != ConnectionState::Disconnected {
                return Err(ClientError::AlreadyConnected);
            }
            lifecycle.state = ConnectionState::Connecting;
            lifecycle.session += 1;
            lifecycle.session
        };

        let outcome = match self.handshake(transport.clone(), session).await {
            Ok(result) => self.complete_handshake(session, result),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(result) => {
                info!(
                    server = %result.server_info.name,
                    version = %result.server_info.version,
                    protocol = %result.protocol_version,
                    "Connected to server"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, "Handshake failed");
                self.abandon_handshake(session, &transport);
                if let Err(close_err) = transport.disconnect().await {
                    debug!(error = %close_err, "Failed to close transport after handshake failure");
                }
                Err(err)
            }
        }
    }

    async fn handshake(&self, transport: Arc<dyn Transport>, session: u64) -> Result<InitializeResult, ClientError> {
        let correlator = self.correlator.clone();
        transport.on_message(Arc::new(move |text: String| route_inbound(&correlator, &text)));
        transport.connect().await?;

        {
            // Holding the lifecycle lock orders this against `disconnect`.
            let lifecycle = self.lifecycle.write();
            if !lifecycle.is_handshaking(session) {
                return Err(ClientError::ConnectionClosed);
            }
            *self.transport.write() = Some(transport);
        }

        let params = serde_json::to_value(InitializeParams {
            client: self.client_info.clone(),
            capabilities: self.capabilities.clone(),
        })?;
        let result = self.round_trip(INITIALIZE, params, self.handshake_timeout).await?;
        decode(INITIALIZE, result)
    }

    fn complete_handshake(&self, session: u64, result: InitializeResult) -> Result<InitializeResult, ClientError> {
        let mut lifecycle = self.lifecycle.write();
        if !lifecycle.is_handshaking(session) {
            return Err(ClientError::ConnectionClosed);
        }
        *self.server.write() = Some(result.clone());
        lifecycle.state = ConnectionState::Connected;
        Ok(result)
    }

    /// Rolls back a failed handshake unless `disconnect` or a newer
    /// `connect` has already taken over.
    fn abandon_handshake(&self, session: u64, transport: &Arc<dyn Transport>) {
        let mut lifecycle = self.lifecycle.write();
        if !lifecycle.is_handshaking(session) {
            return;
        }
        let mut slot = self.transport.write();
        if slot.as_ref().is_some_and(|bound| Arc::ptr_eq(bound, transport)) {
            slot.take();
        }
        self.correlator.fail_all();
        lifecycle.state = ConnectionState::Disconnected;
    }

    /// Disconnects. Requests still in flight fail with
    /// [`ClientError::ConnectionClosed`], and so does a handshake that is
    /// still running. A no-op when already disconnected.
    pub async fn disconnect(&self) -> Result<(), ClientError> {
        let transport = {
            let mut lifecycle = self.lifecycle.write();
            if lifecycle.state == ConnectionState::Disconnected {
                return Ok(());
            }
            lifecycle.state = ConnectionState::Disconnected;
            self.server.write().take();
            self.transport.write().take()
        };

        let failed = self.correlator.fail_all();
        if let Some(transport) = transport {
            transport.disconnect().await?;
        }
        info!(failed_requests = failed, "Disconnected from server");
        Ok(())
    }

    /// Sends `method` and waits up to `timeout` (or the configured default)
    /// for its result.
    pub async fn send(&self, method: &str, params: Value, timeout: Option<Duration>) -> Result<Value, ClientError> {
        self.ensure_connected()?;
        let timeout = timeout.unwrap_or_else(|| self.correlator.default_timeout());
        self.round_trip(method, params, timeout).await
    }

    /// Sends `method` with the default timeout.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        self.send(method, params, None).await
    }

    /// Sends a notification. No response is expected.
    pub async fn notify(&self, method: &str, params: Value) -> Result<(), ClientError> {
        self.ensure_connected()?;
        let transport = self.current_transport()?;
        let text = serde_json::to_string(&Request::notification(method, Some(params)))?;
        transport.send_message(&text).await?;
        Ok(())
    }

    /// Lists the server's resources.
    pub async fn list_resources(&self) -> Result<ListResourcesResult, ClientError> {
        self.call_typed(RESOURCES_LIST, json!({})).await
    }

    /// Reads the resource at `uri`.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ClientError> {
        self.call_typed(RESOURCES_READ, json!({ "uri": uri })).await
    }

    /// Lists the server's tools.
    pub async fn list_tools(&self) -> Result<ListToolsResult, ClientError> {
        self.call_typed(TOOLS_LIST, json!({})).await
    }

    /// Calls the tool `name` with `arguments`.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolResult, ClientError> {
        self.call_typed(TOOLS_CALL, json!({ "name": name, "arguments": arguments }))
            .await
    }

    /// Lists the server's prompts.
    pub async fn list_prompts(&self) -> Result<ListPromptsResult, ClientError> {
        self.call_typed(PROMPTS_LIST, json!({})).await
    }

    /// Renders the prompt `name` with `arguments`.
    pub async fn get_prompt(&self, name: &str, arguments: Value) -> Result<GetPromptResult, ClientError> {
        self.call_typed(PROMPTS_GET, json!({ "name": name, "arguments": arguments }))
            .await
    }

    async fn call_typed<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ClientError> {
        let result = self.request(method, params).await?;
        decode(method, result)
    }

    fn ensure_connected(&self) -> Result<(), ClientError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(ClientError::NotConnected)
        }
    }

    fn current_transport(&self) -> Result<Arc<dyn Transport>, ClientError> {
        self.transport.read().clone().ok_or(ClientError::NotConnected)
    }

    async fn round_trip(&self, method: &str, params: Value, timeout: Duration) -> Result<Value, ClientError> {
        let transport = self.current_transport()?;

        // The waiter exists before the request is written.
        let pending = loop {
            match self.correlator.register_request(Id::random(), method) {
                Ok(pending) => break pending,
                Err(CorrelationError::DuplicateId(id)) => debug!(id = %id, "Request id collision, retrying"),
                Err(_) => return Err(ClientError::ConnectionClosed),
            }
        };

        let request = Request::with_id(method, Some(params), pending.id().clone());
        let text = serde_json::to_string(&request)?;
        trace!(method, id = %pending.id(), "Sending request");
        transport.send_message(&text).await?;

        match pending.wait(Some(timeout)).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(error)) => Err(ClientError::Remote {
                code: error.code,
                message: error.message,
                data: error.data,
            }),
            Err(CorrelationError::Timeout(timeout)) => Err(ClientError::Timeout {
                method: method.to_string(),
                timeout,
            }),
            Err(_) => Err(ClientError::ConnectionClosed),
        }
    }
}

fn route_inbound(correlator: &RequestResponseCorrelator, text: &str) {
    let message = match Message::decode(text) {
        Ok(message) => message,
        Err(err) => {
            warn!(error = %err, "Dropping undecodable message from server");
            return;
        }
    };

    if let Some(method) = &message.method {
        debug!(method = %method, "Ignoring server-initiated message");
        return;
    }
    correlator.correlate_response(message);
}

fn decode<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|err| ClientError::InvalidResponse {
        method: method.to_string(),
        reason: err.to_string(),
    })
}
