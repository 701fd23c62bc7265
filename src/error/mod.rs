//! Error module for the Makai MCP engine.
//!
//! This module provides the error handling framework for the whole crate: one
//! enum per concern (configuration, protocol, transport, client) aggregated by
//! [`MakaiError`], plus an error reporting hook for failures that happen on
//! background tasks and therefore have no caller to return to.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use thiserror::Error;

pub mod client;
pub mod config;
pub mod protocol;
pub mod transport;

pub use client::ClientError;
pub use config::ConfigError;
pub use protocol::ProtocolError;
pub use transport::TransportError;

/// Result type alias used throughout the Makai MCP engine.
pub type MakaiResult<T> = Result<T, MakaiError>;

/// Core error enum for the Makai MCP engine.
#[derive(Error, Debug)]
pub enum MakaiError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to the MCP protocol handling.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Errors related to transport mechanisms (stdio, child process, in-memory).
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Errors surfaced by the MCP client.
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/Deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

/// Error reporting structure to provide context and debugging information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The original error that occurred.
    pub error: MakaiError,

    /// The component where the error occurred.
    pub component: String,

    /// Additional context information to help with debugging.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    ///
    /// # Arguments
    ///
    /// * `error` - The error that occurred
    /// * `component` - The component where the error occurred
    pub fn new<S: Into<String>>(error: MakaiError, component: S) -> Self {
        Self {
            error,
            component: component.into(),
            details: None,
        }
    }

    /// Adds detail information to the error context.
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Error reporter trait for reporting errors to various sinks.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    /// Report an error with context.
    fn report(&self, context: ErrorContext);
}

/// Error reporter that logs errors using the tracing framework.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        tracing::error!(
            error = %context.error,
            component = %context.component,
            details = context.details.as_deref().unwrap_or("None"),
            "Error reported"
        );
    }
}

static ERROR_REPORTER: OnceCell<Arc<dyn ErrorReporter>> = OnceCell::new();

/// Set the global error reporter.
///
/// Only the first call takes effect; later calls are ignored with a warning.
pub fn set_error_reporter(reporter: Arc<dyn ErrorReporter>) {
    if ERROR_REPORTER.set(reporter).is_err() {
        tracing::warn!("Error reporter was already installed, ignoring new reporter");
    }
}

/// Report an error through the installed reporter.
///
/// Falls back to the tracing reporter when none has been installed.
pub fn report_error(context: ErrorContext) {
    match ERROR_REPORTER.get() {
        Some(reporter) => reporter.report(context),
        None => TracingErrorReporter.report(context),
    }
}
