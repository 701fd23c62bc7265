// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Byte-stream transports.
//!
//! A transport moves whole messages between two peers. Every transport here
//! frames messages as single lines of text: the reader splits on `\n`, strips
//! a trailing `\r`, skips blank lines and hands each line to the registered
//! callback in arrival order.

pub mod memory;
pub mod process;
pub mod stdio;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace, warn};

use crate::error::TransportError;

pub use memory::MemoryTransport;
pub use process::ProcessTransport;
pub use stdio::StdioTransport;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Receives each inbound message.
pub type MessageCallback = Arc<dyn Fn(String) + Send + Sync>;

/// A bidirectional message channel to one peer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sets the callback that receives inbound messages. May be called before
    /// or after [`connect`](Transport::connect); the latest callback wins.
    fn on_message(&self, callback: MessageCallback);

    /// Opens the channel and starts delivering inbound messages.
    async fn connect(&self) -> TransportResult<()>;

    /// Sends one message. The text must not contain a newline.
    async fn send_message(&self, message: &str) -> TransportResult<()>;

    /// Closes the channel and stops the reader. Idempotent.
    async fn disconnect(&self) -> TransportResult<()>;
}

/// Slot holding the current callback, shared with reader tasks.
#[derive(Clone, Default)]
pub(crate) struct CallbackSlot(Arc<RwLock<Option<MessageCallback>>>);

impl CallbackSlot {
    pub(crate) fn set(&self, callback: MessageCallback) {
        *self.0.write() = Some(callback);
    }

    pub(crate) fn deliver(&self, message: String) {
        // Clone out so the callback runs without the lock held.
        let callback = self.0.read().clone();
        match callback {
            Some(callback) => callback(message),
            None => debug!("Dropping inbound message: no callback registered"),
        }
    }
}

/// Reads line-framed messages from `reader` until EOF or an I/O error.
pub(crate) async fn read_lines<R>(reader: R, callback: CallbackSlot, source: &'static str)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim_end_matches('\r');
                if line.trim().is_empty() {
                    continue;
                }
                trace!(source, bytes = line.len(), "Inbound message");
                callback.deliver(line.to_string());
            }
            Ok(None) => {
                debug!(source, "Reached end of stream");
                break;
            }
            Err(err) => {
                warn!(source, error = %err, "Read failed, stopping reader");
                break;
            }
        }
    }
}

/// Writes `message` followed by a newline and flushes.
pub(crate) async fn write_line<W>(writer: &mut W, message: &str) -> TransportResult<()>
where
    W: AsyncWrite + Unpin,
{
    if message.contains('\n') {
        return Err(TransportError::EmbeddedNewline);
    }
    writer.write_all(message.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
