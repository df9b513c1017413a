// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> load_config --> cmd::run_* handlers
//!   stage, options
//!                    |
//!                    v
//!              TaskResult { Succeeded | Failed }
//! ```

pub mod options;
pub mod stage;


use std::process::ExitCode;

use tracing::debug;

use crate::cli::global::GlobalOptions;
use crate::config::agent::AgentEnvironment;
use crate::config::loader::ConfigLoader;
use crate::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::error::Result;

/// Single pass/fail outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    Succeeded { commit: String },
    Failed { message: String },
}

impl TaskResult {
    /// Converts an error chain into [`TaskResult::Failed`].
    ///
    /// Causes already quoted by the error above them are not repeated.
    #[must_use]
    pub fn failed(error: &anyhow::Error) -> Self {
        let mut message = error.to_string();
        for cause in error.chain().skip(1) {
            let cause = cause.to_string();
            if !message.ends_with(&cause) {
                message.push_str(": ");
                message.push_str(&cause);
            }
        }
        Self::Failed { message }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Stacks every configuration source in precedence order.
///
/// # Errors
///
/// Returns an error if a `--set` key is not a valid configuration path.
pub fn build_config_loader(
    global: &GlobalOptions,
    agent: AgentEnvironment,
) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader
        .with_agent_environment(agent)
        .with_env_prefix(ENV_PREFIX);
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(&key, value)?;
    }
    Ok(loader)
}

/// Loads configuration from files, the process environment, and CLI overrides.
///
/// # Errors
///
/// Returns an error if a source cannot be read or deserialized.
pub fn load_config(global: &GlobalOptions) -> Result<Config> {
    let loader = build_config_loader(global, AgentEnvironment::from_env())?;
    for line in loader.format_loaded_files() {
        debug!("config {line}");
    }
    loader.build()
}
