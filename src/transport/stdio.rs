// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Transport over the current process's stdin and stdout.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{BufReader, Stdout};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{read_lines, write_line, CallbackSlot, MessageCallback, Transport, TransportResult};
use crate::error::TransportError;

/// Server-side transport reading requests from stdin and writing responses
/// to stdout. Nothing else may write to stdout while it is connected.
#[derive(Default)]
pub struct StdioTransport {
    callback: CallbackSlot,
    reader: Mutex<Option<JoinHandle<()>>>,
    writer: tokio::sync::Mutex<Option<Stdout>>,
    closed: Arc<Notify>,
}

impl StdioTransport {
    /// Creates a disconnected transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves once stdin reaches end of file after [`connect`](Transport::connect).
    pub async fn wait_closed(&self) {
        self.closed.notified().await;
    }
}

#[async_trait]
impl Transport for StdioTransport {
    fn on_message(&self, callback: MessageCallback) {
        self.callback.set(callback);
    }

    async fn connect(&self) -> TransportResult<()> {
        let mut writer = self.writer.lock().await;
        if writer.is_some() {
            return Err(TransportError::AlreadyConnected);
        }

        let callback = self.callback.clone();
        let closed = self.closed.clone();
        let task = tokio::spawn(async move {
            read_lines(BufReader::new(tokio::io::stdin()), callback, "stdin").await;
            closed.notify_one();
        });
        *self.reader.lock() = Some(task);
        *writer = Some(tokio::io::stdout());

        debug!("Stdio transport connected");
        Ok(())
    }

    async fn send_message(&self, message: &str) -> TransportResult<()> {
        let mut writer = self.writer.lock().await;
        let stdout = writer.as_mut().ok_or(TransportError::NotConnected)?;
        write_line(stdout, message).await
    }

    async fn disconnect(&self) -> TransportResult<()> {
        if let Some(task) = self.reader.lock().take() {
            task.abort();
        }
        if self.writer.lock().await.take().is_some() {
            debug!("Stdio transport disconnected");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_before_connect_fails() {
        let transport = StdioTransport::new();
        let err = transport.send_message("{}").await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));

        // Disconnecting an idle transport is a no-op.
        transport.disconnect().await.unwrap();
    }
}
