// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output sinks for relayed process output.
//!
//! ```text
//! reader task --> redact(line) --> OutputSink::line(stream, line)
//!                                    TracingSink   info!/warn! events
//!                                    MemorySink    Vec (tests, reports)
//! ```
//!
//! Lines reach a sink already redacted; sinks never see raw secrets.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::logging::GIT_OUTPUT_TARGET;

/// Which standard stream a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::Stderr => write!(f, "stderr"),
        }
    }
}

/// Receives process output one line at a time, as it is produced.
pub trait OutputSink: Send + Sync {
    fn line(&self, stream: StreamKind, line: &str);
}

/// Relays lines as `tracing` events under [`GIT_OUTPUT_TARGET`].
///
/// git writes progress to stderr, so both streams log at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn line(&self, stream: StreamKind, line: &str) {
        info!(target: GIT_OUTPUT_TARGET, %stream, "{line}");
    }
}

/// Keeps every relayed line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(StreamKind, String)>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines received so far.
    #[must_use]
    pub fn lines(&self) -> Vec<(StreamKind, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// All received text joined with newlines, regardless of stream.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines()
            .into_iter()
            .map(|(_, line)| line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputSink for MemorySink {
    fn line(&self, stream: StreamKind, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((stream, line.to_string()));
    }
}
