// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Transport to a spawned child process over its stdin and stdout.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{read_lines, write_line, CallbackSlot, MessageCallback, Transport, TransportResult};
use crate::error::TransportError;

struct Connection {
    child: Child,
    stdin: ChildStdin,
    stdout_task: JoinHandle<()>,
    stderr_task: JoinHandle<()>,
}

/// Client-side transport that launches a server process.
///
/// The child's stdout carries responses, its stdin carries requests and its
/// stderr is re-emitted as log events.
pub struct ProcessTransport {
    command: String,
    args: Vec<String>,
    callback: CallbackSlot,
    connection: Mutex<Option<Connection>>,
}

impl ProcessTransport {
    /// Prepares to run `command` with `args`. Nothing is spawned until
    /// [`connect`](Transport::connect).
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            callback: CallbackSlot::default(),
            connection: Mutex::new(None),
        }
    }

    /// The program being run.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Operating-system id of the running child, if connected.
    pub async fn pid(&self) -> Option<u32> {
        self.connection.lock().await.as_ref().and_then(|c| c.child.id())
    }
}

#[async_trait]
impl Transport for ProcessTransport {
    fn on_message(&self, callback: MessageCallback) {
        self.callback.set(callback);
    }

    async fn connect(&self) -> TransportResult<()> {
        let mut connection = self.connection.lock().await;
        if connection.is_some() {
            return Err(TransportError::AlreadyConnected);
        }

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TransportError::SpawnError {
                command: self.command.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout), Some(stderr)) = (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            let _ = child.kill().await;
            return Err(TransportError::Closed);
        };

        let callback = self.callback.clone();
        let stdout_task = tokio::spawn(async move {
            read_lines(BufReader::new(stdout), callback, "child-stdout").await;
        });

        let command = self.command.clone();
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(target: "makai_mcp::child", command = %command, "{}", line.trim_end());
            }
        });

        info!(command = %self.command, pid = ?child.id(), "Spawned server process");
        *connection = Some(Connection {
            child,
            stdin,
            stdout_task,
            stderr_task,
        });
        Ok(())
    }

    async fn send_message(&self, message: &str) -> TransportResult<()> {
        let mut connection = self.connection.lock().await;
        let conn = connection.as_mut().ok_or(TransportError::NotConnected)?;
        write_line(&mut conn.stdin, message).await.map_err(|err| match err {
            TransportError::Io(io) if io.kind() == std::io::ErrorKind::BrokenPipe => TransportError::Closed,
            other => other,
        })
    }

    async fn disconnect(&self) -> TransportResult<()> {
        let Some(conn) = self.connection.lock().await.take() else {
            return Ok(());
        };
        let Connection {
            mut child,
            stdin,
            stdout_task,
            stderr_task,
        } = conn;

        drop(stdin);
        stdout_task.abort();
        stderr_task.abort();

        if let Err(err) = child.kill().await {
            // The child may have exited on its own after stdin closed.
            warn!(command = %self.command, error = %err, "Failed to kill server process");
        }
        debug!(command = %self.command, "Process transport disconnected");
        Ok(())
    }
}
