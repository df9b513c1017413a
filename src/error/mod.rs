// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!          StageError (~24 bytes)
//!                 |
//!   +--------+----+----+------+-------+
//!   |        |         |      |       |
//!   v        v         v      v       v
//! Config  Process     Git     Io    Other
//!   Box     Box       Box    Box   Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Config   MissingKey, InvalidValue, NoCredentials
//!   Process  ToolNotFound, SpawnFailed, OutputError
//!   Git      CommandFailed, BlockedPromptRisk, EmptyOutput, UnexpectedOutput
//! ```
//!
//! Every failure is fatal for the run: nothing is retried, nothing is
//! rolled back. The entry point turns the first error into a single
//! failed `TaskResult`.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`StageError`].
pub type StageResult<T> = std::result::Result<T, StageError>;

/// Top-level error type for a staging run.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum StageError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// The VCS binary could not be located or spawned.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// A git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for StageError {
                fn from(err: $error) -> Self {
                    StageError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    ProcessError => Process,
    GitError => Git,
    std::io::Error => Io,
}

// --- Config Errors ---

/// Configuration errors. Fatal, never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Neither username/password nor a token was supplied.
    #[error(
        "unsupported or no authentication method supplied: set connection.username and \
         connection.password, or connection.token"
    )]
    NoCredentials,
}

impl ConfigError {
    /// Shorthand for [`ConfigError::MissingKey`].
    #[must_use]
    pub fn missing(section: &str, key: &str) -> Self {
        Self::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        }
    }

    /// Shorthand for [`ConfigError::InvalidValue`].
    #[must_use]
    pub fn invalid(section: &str, key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be found in any searched location.
    #[error(
        "{name} not found (searched: {searched}). Please ensure it is installed \
         system-wide, or available in the agent externals folder"
    )]
    ToolNotFound { name: String, searched: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed while waiting on the process or reading its output.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// A git invocation exited with a non-zero code.
    #[error("git {operation} failed with exit code {code}")]
    CommandFailed { operation: String, code: i32 },

    /// A credential helper is configured and could block on an interactive prompt.
    #[error(
        "credential helper '{helper}' is configured; its interactive prompt can block \
         this run indefinitely"
    )]
    BlockedPromptRisk { helper: String },

    /// A query succeeded but produced no usable output.
    #[error("git {operation} returned no output")]
    EmptyOutput { operation: String },

    /// A query returned text that is not the expected shape.
    #[error("git {operation} returned unexpected output '{output}'")]
    UnexpectedOutput { operation: String, output: String },
}

impl GitError {
    /// Shorthand for [`GitError::CommandFailed`].
    #[must_use]
    pub fn failed(operation: &str, code: i32) -> Self {
        Self::CommandFailed {
            operation: operation.to_string(),
            code,
        }
    }
}
