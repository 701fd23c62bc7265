// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Request dispatcher.
//!
//! This module provides the method table and the per-message dispatch step:
//! decode, validate, look up the handler, invoke it, and encode exactly one
//! response for every request that carries an `id`. No failure inside a
//! handler (error or panic) escapes the dispatch boundary.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::JsonRpcError;
use super::types::{Id, Response};
use super::validation::{validate_request, ValidatedMessage};

/// Default upper bound on inbound message size.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// Per-call information handed to a method handler.
#[derive(Debug, Clone, Default)]
pub struct MethodContext {
    /// Method being invoked
    pub method: String,

    /// Request identifier, `None` for notifications
    pub id: Option<Id>,
}

/// Result returned by method handlers. Any error is reported to the peer as a
/// generic server error carrying the error's description.
pub type MethodResult = anyhow::Result<Value>;

/// Type alias for method handler's future return type.
pub type MethodHandlerFuture = BoxFuture<'static, MethodResult>;

/// Shared, type-erased method handler.
pub type MethodHandlerFn = Arc<dyn MethodHandler + Send + Sync>;

/// Trait for method handlers to implement.
pub trait MethodHandler {
    /// Handle a method call asynchronously.
    ///
    /// # Parameters
    /// * `params` - The parameters passed to the method, `{}` when absent.
    /// * `context` - Additional context for the method call.
    fn handle(&self, params: Value, context: MethodContext) -> MethodHandlerFuture;
}

impl<F, Fut> MethodHandler for F
where
    F: Send + Sync + 'static + Fn(Value, MethodContext) -> Fut,
    Fut: Future<Output = MethodResult> + Send + 'static,
{
    fn handle(&self, params: Value, context: MethodContext) -> MethodHandlerFuture {
        Box::pin((self)(params, context))
    }
}

/// Dispatcher for inbound requests.
///
/// Cloning is cheap and clones share the same method table, so a clone can be
/// moved into each dispatch task.
#[derive(Clone)]
pub struct JsonRpcHandler {
    methods: Arc<RwLock<HashMap<String, MethodHandlerFn>>>,
    max_message_size: usize,
}

impl Default for JsonRpcHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonRpcHandler {
    /// Creates a dispatcher with an empty method table.
    pub fn new() -> Self {
        Self {
            methods: Arc::new(RwLock::new(HashMap::new())),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Sets the maximum accepted inbound message size in bytes.
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    /// Registers a method handler function, replacing any previous binding.
    pub fn register_method<F, Fut>(&self, method: impl Into<String>, handler: F)
    where
        F: Send + Sync + 'static + Fn(Value, MethodContext) -> Fut,
        Fut: Future<Output = MethodResult> + Send + 'static,
    {
        self.register_handler(method, Arc::new(handler));
    }

    /// Registers an already type-erased handler, replacing any previous binding.
    pub fn register_handler(&self, method: impl Into<String>, handler: MethodHandlerFn) {
        let method = method.into();
        if self.methods.write().insert(method.clone(), handler).is_some() {
            debug!(method = %method, "Replaced existing method handler");
        }
    }

    /// Returns true if a handler is bound to `method`.
    pub fn has_method(&self, method: &str) -> bool {
        self.methods.read().contains_key(method)
    }

    /// Returns the names of all registered methods, sorted.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Handles one inbound message and returns the encoded response, if any.
    ///
    /// Returns `None` for notifications, for responses, and for failures that
    /// carry no identifier to address a response to.
    pub async fn handle_request(&self, text: impl AsRef<str>) -> Option<String> {
        let response = self.dispatch(text.as_ref()).await?;
        Some(serde_json::to_string(&response).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to encode response");
            format!(
                r#"{{"jsonrpc":"2.0","id":{},"error":{{"code":-32603,"message":"Internal error: failed to encode response"}}}}"#,
                serde_json::to_string(&response.id).unwrap_or_else(|_| "null".to_string())
            )
        }))
    }

    /// Handles one inbound message and returns the response, if any.
    pub async fn dispatch(&self, text: &str) -> Option<Response> {
        let request = match validate_request(text, self.max_message_size) {
            Ok(ValidatedMessage::Request(request)) => request,
            Ok(ValidatedMessage::Response(id)) => {
                debug!(id = ?id, "Ignoring inbound response with no pending request");
                return None;
            }
            Err(err) => {
                let error = err.to_jsonrpc_error();
                return match err.id() {
                    Some(id) => Some(Response::error(id.clone(), error)),
                    None => {
                        warn!(code = error.code, message = %error.message, "Dropping undeliverable error response");
                        None
                    }
                };
            }
        };

        let context = MethodContext {
            method: request.method.clone(),
            id: request.id.clone(),
        };
        let params = request.params.unwrap_or_else(|| Value::Object(Default::default()));

        debug!(method = %request.method, id = ?request.id, "Dispatching request");
        let outcome = self.process_method_call(&request.method, params, context).await;

        match (request.id, outcome) {
            (Some(id), Ok(result)) => Some(Response::success(id, result)),
            (Some(id), Err(error)) => Some(Response::error(id, error)),
            (None, Err(error)) => {
                debug!(method = %request.method, message = %error.message, "Notification handler failed");
                None
            }
            (None, Ok(_)) => None,
        }
    }

    /// Processes a method call by dispatching it to the registered handler.
    async fn process_method_call(
        &self,
        method: &str,
        params: Value,
        context: MethodContext,
    ) -> Result<Value, JsonRpcError> {
        // The lock is released before the handler runs.
        let handler = match self.methods.read().get(method) {
            Some(handler) => handler.clone(),
            None => return Err(JsonRpcError::method_not_found(method)),
        };

        let future = std::panic::catch_unwind(AssertUnwindSafe(|| handler.handle(params, context)))
            .map_err(|panic| JsonRpcError::server_error(panic_message(panic.as_ref())))?;

        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err)) => Err(JsonRpcError::server_error(format!("{err:#}"))),
            Err(panic) => Err(JsonRpcError::server_error(panic_message(panic.as_ref()))),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {msg}")
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("handler panicked: {msg}")
    } else {
        "handler panicked".to_string()
    }
}
