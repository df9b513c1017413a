// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitstage using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitstage [global options] [command]
//! stage     (default)
//! options
//! version
//! ```

pub mod global;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};

use crate::cli::global::GlobalOptions;

/// Stages a hosted git repository into a local directory for a CI job.
#[derive(Debug, Parser)]
#[command(
    name = "gitstage",
    author,
    version,
    about = "CI repository staging tool",
    long_about = "gitstage Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Initializes a repository in the destination directory, fetches\n\
                  it from the configured service connection with one-shot\n\
                  credentials, and checks out the requested branch or commit.",
    after_help = "CONFIGURATION:\n\n\
                  gitstage reads `gitstage.toml` from the current directory unless\n\
                  --no-default-config is given, then every --config file in order,\n\
                  then the CI agent's INPUT_*/ENDPOINT_*/AGENT_* variables, then\n\
                  GITSTAGE_<SECTION>__<KEY> variables, then --set and --destination."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute (defaults to `stage`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The command to run, `stage` when none was given.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }
}

/// Available commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Subcommand)]
pub enum Command {
    /// Stages the repository (default).
    #[default]
    Stage,

    /// Lists all options and their resolved values, secrets hidden.
    Options,

    /// Shows the version.
    Version,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Tries to parse command-line arguments from an iterator.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
