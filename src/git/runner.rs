// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The seam between git operations and process execution.
//!
//! ```text
//! RepositoryClient
//!        |
//!        v
//! CommandRunner ---- run_captured (relay + capture stdout)
//!        |      '--- run_streamed (relay only, exit code)
//!        v
//! GitRunner --> ProcessBuilder --> git
//!   cwd = destination
//!   GIT_TERMINAL_PROMPT=0, GCM_INTERACTIVE=never
//!   redaction from the AuthContext registry
//! ```
//!
//! Runners never fail on a non-zero exit; the client decides what an exit
//! code means for each operation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::auth::{AuthContext, SecretRegistry};
use crate::core::process::builder::{ExecutionResult, ProcessBuilder};
use crate::core::process::sink::OutputSink;
use crate::error::StageResult;

/// Executes git with a given argument vector.
pub trait CommandRunner: Send + Sync {
    /// Runs to completion, relaying output and capturing stdout.
    fn run_captured<'a>(&'a self, args: &'a [String])
    -> BoxFuture<'a, StageResult<ExecutionResult>>;

    /// Runs to completion, relaying output as it arrives; returns the exit code.
    fn run_streamed<'a>(&'a self, args: &'a [String]) -> BoxFuture<'a, StageResult<i32>>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for Arc<R> {
    fn run_captured<'a>(
        &'a self,
        args: &'a [String],
    ) -> BoxFuture<'a, StageResult<ExecutionResult>> {
        (**self).run_captured(args)
    }

    fn run_streamed<'a>(&'a self, args: &'a [String]) -> BoxFuture<'a, StageResult<i32>> {
        (**self).run_streamed(args)
    }
}

/// Runs the real git binary inside the destination directory.
pub struct GitRunner {
    program: PathBuf,
    cwd: PathBuf,
    sink: Arc<dyn OutputSink>,
    registry: SecretRegistry,
}

impl GitRunner {
    /// Creates a runner redacting with the context's registry.
    ///
    /// Taking the [`AuthContext`] means the secrets are registered before
    /// the first git process can exist.
    pub fn new(
        program: impl Into<PathBuf>,
        cwd: impl Into<PathBuf>,
        sink: Arc<dyn OutputSink>,
        auth: &AuthContext,
    ) -> Self {
        Self {
            program: program.into(),
            cwd: cwd.into(),
            sink,
            registry: auth.registry().clone(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    fn builder(&self, args: &[String]) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .name("git")
            .args(args)
            .cwd(&self.cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
            .sink(Arc::clone(&self.sink))
            .redact_with(self.registry.clone())
    }
}

impl CommandRunner for GitRunner {
    fn run_captured<'a>(
        &'a self,
        args: &'a [String],
    ) -> BoxFuture<'a, StageResult<ExecutionResult>> {
        Box::pin(async move { self.builder(args).capture_output().run().await })
    }

    fn run_streamed<'a>(&'a self, args: &'a [String]) -> BoxFuture<'a, StageResult<i32>> {
        Box::pin(async move {
            let result = self.builder(args).run().await?;
            Ok(result.exit_code())
        })
    }
}

impl std::fmt::Debug for GitRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRunner")
            .field("program", &self.program)
            .field("cwd", &self.cwd)
            .finish_non_exhaustive()
    }
}
