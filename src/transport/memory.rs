// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! In-process transport pair.

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use super::{CallbackSlot, MessageCallback, Transport, TransportResult};
use crate::error::TransportError;

/// One end of a connected in-memory channel.
///
/// Messages sent on one end are delivered to the other end's callback in
/// order. Disconnecting one end stops delivery to the other.
pub struct MemoryTransport {
    outbound: Mutex<Option<UnboundedSender<String>>>,
    inbound: Mutex<Option<UnboundedReceiver<String>>>,
    callback: CallbackSlot,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl MemoryTransport {
    /// Creates two connected ends.
    pub fn pair() -> (Self, Self) {
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, b_rx) = mpsc::unbounded_channel();
        (Self::new(a_tx, b_rx), Self::new(b_tx, a_rx))
    }

    fn new(outbound: UnboundedSender<String>, inbound: UnboundedReceiver<String>) -> Self {
        Self {
            outbound: Mutex::new(Some(outbound)),
            inbound: Mutex::new(Some(inbound)),
            callback: CallbackSlot::default(),
            reader: Mutex::new(None),
        }
    }

    /// True while the reader is running.
    pub fn is_connected(&self) -> bool {
        self.reader.lock().as_ref().is_some_and(|task| !task.is_finished())
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn on_message(&self, callback: MessageCallback) {
        self.callback.set(callback);
    }

    async fn connect(&self) -> TransportResult<()> {
        if self.reader.lock().is_some() {
            return Err(TransportError::AlreadyConnected);
        }
        let mut inbound = self.inbound.lock().take().ok_or(TransportError::Closed)?;

        let callback = self.callback.clone();
        let task = tokio::spawn(async move {
            while let Some(message) = inbound.recv().await {
                callback.deliver(message);
            }
            debug!("Memory transport peer closed");
        });
        *self.reader.lock() = Some(task);
        Ok(())
    }

    async fn send_message(&self, message: &str) -> TransportResult<()> {
        if self.reader.lock().is_none() {
            return Err(TransportError::NotConnected);
        }
        let outbound = self.outbound.lock();
        let sender = outbound.as_ref().ok_or(TransportError::NotConnected)?;
        sender.send(message.to_string()).map_err(|_| TransportError::Closed)
    }

    async fn disconnect(&self) -> TransportResult<()> {
        self.outbound.lock().take();
        if let Some(task) = self.reader.lock().take() {
            task.abort();
        }
        Ok(())
    }
}
