// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and output relay.
//!
//! ```text
//! ProcessBuilder::new(git)
//!   .args() .cwd() .env() .sink() .redact_with()
//!   .run()
//!       --> tokio::process::Command
//!           stream stdout/stderr line by line
//!           redact --> OutputSink
//!       --> ExecutionResult { exit_code, stdout, stderr }
//! ```

pub mod builder;
mod io;
mod runner;
pub mod sink;
