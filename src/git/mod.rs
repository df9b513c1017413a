// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git access layer.
//!
//! ```text
//!          StagingPipeline
//!                 |
//!                 v
//!   ,----------------------------,
//!   |  RepositoryClient (client) |  typed operations
//!   '-------------+--------------'
//!                 |  options.rs: OneShotOverrides, Fetch/Checkout/Submodule
//!                 v
//!   ,----------------------------,
//!   |   CommandRunner (runner)   |  args --> exit code / output
//!   '------+--------------+------'
//!          |              |
//!          v              v
//!      GitRunner    ScriptedRunner
//!   (ProcessBuilder)   (tests)
//! ```
//!
//! `locate.rs` resolves the git binary before any of this runs.

pub mod client;
pub mod locate;
pub mod options;
pub mod runner;

pub use client::RepositoryClient;
pub use locate::locate_git;
pub use options::{CheckoutOptions, FetchOptions, OneShotOverrides, SubmoduleMode, SubmoduleOptions};
pub use runner::{CommandRunner, GitRunner};

#[cfg(test)]
pub(crate) mod test_support;
