// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Staging pipeline.
//!
//! ```text
//! Uninitialized --> Initialized --> RemoteConfigured --> Fetched
//!                                                           |
//!        Complete <-- SubmodulesSynced <-- CheckedOut <-----'
//!           ^                                  |
//!           '------ (no submodules) -----------'
//! ```
//!
//! Each state is entered only from its predecessor, on success. The first
//! failure stops the run; nothing is retried or rolled back.

pub mod pipeline;
pub mod plan;

use std::fmt;

pub use pipeline::{StageReport, StagingPipeline};
pub use plan::{CheckoutRef, CredentialHelperPolicy, ProxyConfig, RepositoryTarget, StagingPlan};

/// Progress of one staging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum StageState {
    #[default]
    Uninitialized,
    Initialized,
    RemoteConfigured,
    Fetched,
    CheckedOut,
    SubmodulesSynced,
    Complete,
}

impl StageState {
    /// Whether `next` may be entered from `self`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Uninitialized, Self::Initialized)
                | (Self::Initialized, Self::RemoteConfigured)
                | (Self::RemoteConfigured, Self::Fetched)
                | (Self::Fetched, Self::CheckedOut)
                | (Self::CheckedOut, Self::SubmodulesSynced | Self::Complete)
                | (Self::SubmodulesSynced, Self::Complete)
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::RemoteConfigured => "remote-configured",
            Self::Fetched => "fetched",
            Self::CheckedOut => "checked-out",
            Self::SubmodulesSynced => "submodules-synced",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
