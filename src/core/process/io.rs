// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks
//!     split on \n and \r (git progress redraws with \r)
//!     redact --> sink (FORWARD_TO_SINK)
//!            --> captured String (KEEP_IN_STRING)
//!   wait
//!   --> ExecutionResult { exit_code, stdout, stderr }
//! ```
//!
//! Lines are relayed as they arrive; only streams marked `KEEP_IN_STRING`
//! are held in memory.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::warn;

use super::builder::{ExecutionResult, ProcessBuilder, StreamFlags};
use super::sink::{OutputSink, StreamKind};
use crate::auth::SecretRegistry;
use crate::error::{ProcessError, StageResult};

/// Everything a reader task needs, owned so it can move into the task.
struct StreamReader {
    stream: StreamKind,
    flags: StreamFlags,
    sink: Arc<dyn OutputSink>,
    registry: SecretRegistry,
    process_name: String,
}

impl StreamReader {
    fn spawn<R>(self, reader: Option<R>) -> Option<JoinHandle<String>>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        reader.map(|reader| tokio::spawn(async move { self.read(reader).await }))
    }

    /// Reads until EOF, returning the captured text.
    async fn read<R>(self, reader: R) -> String
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut captured = String::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let chunk = String::from_utf8_lossy(&buf);
                    for piece in chunk.split(['\r', '\n']).filter(|p| !p.is_empty()) {
                        self.emit(piece, &mut captured);
                    }
                }
                Err(e) => {
                    warn!(
                        process = %self.process_name,
                        stream = %self.stream,
                        error = %e,
                        "error reading stream"
                    );
                    break;
                }
            }
        }
        captured
    }

    fn emit(&self, line: &str, captured: &mut String) {
        let line = self.registry.redact(line);
        if self.flags.contains(StreamFlags::FORWARD_TO_SINK) {
            self.sink.line(self.stream, &line);
        }
        if self.flags.contains(StreamFlags::KEEP_IN_STRING) {
            if !captured.is_empty() {
                captured.push('\n');
            }
            captured.push_str(&line);
        }
    }
}

async fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    }
}

impl ProcessBuilder {
    fn reader(&self, stream: StreamKind, flags: StreamFlags, name: &str) -> StreamReader {
        StreamReader {
            stream,
            flags,
            sink: self.output_sink(),
            registry: self.registry().clone(),
            process_name: name.to_string(),
        }
    }

    /// Runs the child process, streaming I/O and waiting for completion.
    pub(super) async fn run_child(
        &self,
        name: &str,
        command_line: &str,
        child: &mut Child,
    ) -> StageResult<ExecutionResult> {
        let stdout_handle = self
            .reader(StreamKind::Stdout, self.stdout_config(), name)
            .spawn(child.stdout.take());
        let stderr_handle = self
            .reader(StreamKind::Stderr, self.stderr_config(), name)
            .spawn(child.stderr.take());

        let exit_status = child
            .wait()
            .await
            .map_err(|e| ProcessError::OutputError {
                command: command_line.to_string(),
                message: e.to_string(),
            })?;

        let stdout = join_reader(stdout_handle).await;
        let stderr = join_reader(stderr_handle).await;

        Ok(ExecutionResult::new(
            exit_status.code().unwrap_or(-1),
            stdout,
            stderr,
        ))
    }
}
