// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Logging for a staging run.
//!
//! ```text
//! gitstage::*            stage transitions, redacted git command lines
//! gitstage::git_output   relayed git stdout/stderr lines (TracingSink)
//!        |
//!        v
//! Console (stderr)            File (optional)
//!   EnvFilter                   EnvFilter
//!   git output switchable       git output always kept
//!   ANSI switchable             stage spans timed on close
//!        |
//!        v
//! LogGuard (flush on drop)
//!
//! LogLevel:  0=Silent 1=Error 2=Warn 3=Info
//!            4=Debug  5=Trace 6=Dump(+deps)
//! ```
//!
//! stdout is reserved for the staged commit id, so console logs go to
//! stderr. Levels 1-5 apply to gitstage's own targets; dependencies stay at
//! `warn` until level 6.

use std::path::Path;

use anyhow::Context;
use bon::Builder;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{ConfigError, Result};

/// Target of every relayed git output line.
///
/// Sits under the `gitstage` prefix so it follows the crate's level, and
/// can be switched off on its own.
pub const GIT_OUTPUT_TARGET: &str = "gitstage::git_output";

/// Verbosity, configured as a number 0-6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum LogLevel {
    /// No output at all.
    Silent = 0,
    Error = 1,
    Warn = 2,
    /// Stage transitions and git output.
    #[default]
    Info = 3,
    /// Adds redacted git command lines.
    Debug = 4,
    Trace = 5,
    /// Trace, including dependency crates.
    Dump = 6,
}

impl LogLevel {
    const ALL: [Self; 7] = [
        Self::Silent,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
        Self::Trace,
        Self::Dump,
    ];

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the level is greater than 6.
    pub fn new(level: u8) -> std::result::Result<Self, ConfigError> {
        Self::from_u8(level).ok_or_else(|| {
            ConfigError::invalid(
                "global",
                "log_level",
                format!("log level must be 0-6, got {level}"),
            )
        })
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_u8(level: u8) -> Option<Self> {
        Self::ALL.get(usize::from(level)).copied()
    }

    const fn base_directives(self) -> &'static str {
        match self {
            Self::Silent => "off",
            Self::Error => "warn,gitstage=error",
            Self::Warn => "warn",
            Self::Info => "warn,gitstage=info",
            Self::Debug => "warn,gitstage=debug",
            Self::Trace => "warn,gitstage=trace",
            Self::Dump => "trace",
        }
    }

    /// `EnvFilter` directives for this level, optionally muting relayed
    /// git output.
    #[must_use]
    pub fn filter_directives(self, git_output: bool) -> String {
        let base = self.base_directives();
        if git_output || self == Self::Silent {
            base.to_string()
        } else {
            format!("{base},{GIT_OUTPUT_TARGET}=off")
        }
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = ConfigError;

    fn try_from(value: u8) -> std::result::Result<Self, <Self as TryFrom<u8>>::Error> {
        Self::new(value)
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level.as_u8()
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Builder)]
pub struct LogConfig {
    #[builder(setters(name = with_console_level), default)]
    console_level: LogLevel,
    #[builder(setters(name = with_file_level), default = LogLevel::Trace)]
    file_level: LogLevel,
    #[builder(setters(name = with_log_file))]
    log_file: Option<String>,
    #[builder(setters(name = with_ansi), default = true)]
    ansi: bool,
    /// Relay git's own output to the console.
    #[builder(setters(name = with_git_output), default = true)]
    git_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LogConfig {
    #[must_use]
    pub const fn console_level(&self) -> LogLevel {
        self.console_level
    }

    #[must_use]
    pub const fn file_level(&self) -> LogLevel {
        self.file_level
    }

    #[must_use]
    pub fn log_file(&self) -> Option<&str> {
        self.log_file.as_deref()
    }

    /// Whether console output carries ANSI colour codes.
    #[must_use]
    pub const fn ansi(&self) -> bool {
        self.ansi
    }

    #[must_use]
    pub const fn git_output(&self) -> bool {
        self.git_output
    }

    #[must_use]
    pub fn console_directives(&self) -> String {
        self.console_level.filter_directives(self.git_output)
    }

    /// The file keeps git output regardless of the console setting.
    #[must_use]
    pub fn file_directives(&self) -> String {
        self.file_level.filter_directives(true)
    }
}

/// Keeps the file writer alive; pending lines are flushed on drop.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

fn create_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    std::fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))
}

/// Installs the global subscriber for this run.
///
/// # Errors
///
/// Fails if the log file cannot be created or a subscriber is already set.
///
/// # Example
///
/// ```no_run
/// use gitstage::logging::{init_logging, LogConfig, LogLevel};
///
/// let config = LogConfig::builder()
///     .with_console_level(LogLevel::Info)
///     .with_git_output(false)
///     .with_log_file("stage.log".to_string())
///     .build();
///
/// let _guard = init_logging(&config)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(config.ansi())
        .with_filter(EnvFilter::new(config.console_directives()));

    let (file_layer, file_guard) = match config.log_file() {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(create_log_file(Path::new(path))?);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(EnvFilter::new(config.file_directives()));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")?;

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
pub(crate) mod test_support;
