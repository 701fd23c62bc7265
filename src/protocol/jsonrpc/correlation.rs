// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Request/response correlation.
//!
//! Every outgoing request parks a single-use waiter under its identifier
//! before the request is transmitted. The inbound reader resolves the waiter
//! when a message with the same identifier arrives; the caller waits with a
//! timeout. The waiter is removed from the registry exactly once, whichever of
//! resolution, timeout, cancellation or disconnect happens first.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use super::error::JsonRpcError;
use super::types::{Id, Message};

/// Default timeout for waiting for a response.
pub const DEFAULT_TIMEOUT_MS: u64 = 30000; // 30 seconds

/// Outcome delivered to a waiter: the remote result or the remote error.
pub type ResponseOutcome = Result<Value, JsonRpcError>;

/// Error indicating a correlation issue.
#[derive(Debug, thiserror::Error)]
pub enum CorrelationError {
    /// No response was received within the timeout period.
    #[error("Request timed out after {0:?} waiting for response")]
    Timeout(Duration),

    /// The waiter was discarded before a response was received.
    #[error("Response channel closed")]
    ChannelClosed,

    /// A waiter is already registered under this identifier.
    #[error("Request id {0} is already pending")]
    DuplicateId(Id),
}

/// A pending request awaiting correlation with a response.
#[derive(Debug)]
struct PendingRequest {
    /// Method of the request, for diagnostics.
    method: String,

    /// The time when the request was registered.
    timestamp: Instant,

    /// The sender half of the oneshot channel for this request.
    response_sender: oneshot::Sender<ResponseOutcome>,
}

/// Manages correlation between outgoing requests and inbound responses.
#[derive(Debug, Clone)]
pub struct RequestResponseCorrelator {
    /// Map of request IDs to pending request data.
    pending_requests: Arc<DashMap<Id, PendingRequest>>,

    /// Default timeout duration for requests.
    default_timeout: Duration,
}

impl Default for RequestResponseCorrelator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestResponseCorrelator {
    /// Creates a new correlator with default settings.
    pub fn new() -> Self {
        Self {
            pending_requests: Arc::new(DashMap::new()),
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Sets the default timeout for all requests.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// The timeout applied when a caller does not pick one.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Registers a waiter for `id`.
    ///
    /// Must be called before the request is transmitted so that a fast reply
    /// cannot arrive ahead of its waiter.
    pub fn register_request(
        &self,
        id: Id,
        method: impl Into<String>,
    ) -> Result<PendingResponse, CorrelationError> {
        let (tx, rx) = oneshot::channel();

        match self.pending_requests.entry(id.clone()) {
            Entry::Occupied(_) => return Err(CorrelationError::DuplicateId(id)),
            Entry::Vacant(slot) => {
                slot.insert(PendingRequest {
                    method: method.into(),
                    timestamp: Instant::now(),
                    response_sender: tx,
                });
            }
        }

        Ok(PendingResponse {
            id,
            receiver: Some(rx),
            pending_requests: Arc::clone(&self.pending_requests),
            default_timeout: self.default_timeout,
        })
    }

    /// Correlates an inbound message with its pending request.
    ///
    /// Returns `true` if the message resolved a waiter, `false` if no waiter
    /// was registered under its identifier (unknown, duplicate or late).
    pub fn correlate_response(&self, message: Message) -> bool {
        let Some(id) = message.id else {
            return false;
        };

        // Removing first makes resolution single-shot: a second message with
        // the same id finds nothing.
        let Some((id, pending)) = self.pending_requests.remove(&id) else {
            debug!(id = %id, "Dropping response with no pending request");
            return false;
        };

        let outcome = match message.error {
            Some(error) => Err(error),
            None => Ok(message.result.unwrap_or(Value::Null)),
        };

        trace!(
            id = %id,
            method = %pending.method,
            elapsed_ms = pending.timestamp.elapsed().as_millis() as u64,
            "Correlated response"
        );

        // The receiver may already be gone if the caller gave up.
        let _ = pending.response_sender.send(outcome);
        true
    }

    /// Discards every pending waiter. Their callers observe
    /// [`CorrelationError::ChannelClosed`]. Returns the number discarded.
    pub fn fail_all(&self) -> usize {
        let ids: Vec<Id> = self.pending_requests.iter().map(|e| e.key().clone()).collect();
        let count = ids
            .iter()
            .filter(|id| self.pending_requests.remove(*id).is_some())
            .count();
        if count > 0 {
            debug!(count, "Failed outstanding requests");
        }
        count
    }

    /// Returns true if a waiter is registered under `id`.
    pub fn is_pending(&self, id: &Id) -> bool {
        self.pending_requests.contains_key(id)
    }

    /// Number of outstanding requests.
    pub fn pending_count(&self) -> usize {
        self.pending_requests.len()
    }
}

/// Caller side of a registered request.
///
/// Dropping it (after a response, on timeout, or because the caller was
/// cancelled) removes its entry from the registry.
#[derive(Debug)]
pub struct PendingResponse {
    id: Id,
    receiver: Option<oneshot::Receiver<ResponseOutcome>>,
    pending_requests: Arc<DashMap<Id, PendingRequest>>,
    default_timeout: Duration,
}

impl PendingResponse {
    /// Identifier this waiter is registered under.
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Waits for the response, up to `timeout` (or the correlator default).
    pub async fn wait(mut self, timeout: Option<Duration>) -> Result<ResponseOutcome, CorrelationError> {
        let timeout = timeout.unwrap_or(self.default_timeout);
        let Some(receiver) = self.receiver.take() else {
            return Err(CorrelationError::ChannelClosed);
        };

        match tokio::time::timeout(timeout, receiver).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => Err(CorrelationError::ChannelClosed),
            Err(_) => Err(CorrelationError::Timeout(timeout)),
        }
    }
}

impl Drop for PendingResponse {
    fn drop(&mut self) {
        self.pending_requests.remove(&self.id);
    }
}
