// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |             stage / options
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML, agent env, GITSTAGE|
//!              '-------------+-------------'
//!                            v
//!                          stage
//!              StagingPlan, StagingPipeline
//!                            |
//!                 +----------+----------+
//!                 v                     v
//!                git                  auth
//!      RepositoryClient, GitRunner   AuthContext,
//!      options, locate_git           SecretRegistry
//!                 |
//!   +-------------v---------------------------+
//!   |  core    process (spawn, relay, redact) |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod auth;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
pub mod stage;
