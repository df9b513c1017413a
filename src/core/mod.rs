// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for process management.
//!
//! ```text
//!       core
//!        |
//!        v
//!     process
//!        |
//!   Builder  Runner  Sink
//!   ExecutionResult
//! ```

pub mod process;
