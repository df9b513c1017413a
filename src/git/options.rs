// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed option sets for git operations.
//!
//! ```text
//! OneShotOverrides   -c key=value pairs, prepended, never persisted
//! FetchOptions       fetch --tags --prune --progress --no-recurse-submodules [--depth=N]
//! CheckoutOptions    checkout --progress --force <ref>
//! SubmoduleOptions   submodule sync [--recursive]
//!                    submodule update --init --force [--recursive] [--depth=N]
//! ```
//!
//! Options are flattened to argument vectors only when handed to a
//! [`CommandRunner`](super::runner::CommandRunner).

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use crate::auth::AuthContext;

// --- One-shot overrides ---

/// Configuration applied to a single git invocation via `-c key=value`.
///
/// Entries are never written to the repository's config.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OneShotOverrides {
    entries: Vec<(String, String)>,
}

impl OneShotOverrides {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Overrides for an authenticated network operation.
    ///
    /// Order: TLS verification (when untrusted certs are accepted), proxy,
    /// then the authorization header.
    #[must_use]
    pub fn for_auth(auth: &AuthContext, proxy: Option<&str>) -> Self {
        let mut overrides = Self::new();
        if auth.accept_untrusted_certs() {
            overrides = overrides.with("http.sslVerify", "false");
        }
        if let Some(proxy) = proxy {
            overrides = overrides.with("http.proxy", proxy);
        }
        overrides.with("http.extraheader", auth.header().header_line())
    }

    /// Adds an entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in application order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Flattens to `-c key=value` pairs.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(key, value)| ["-c".to_string(), format!("{key}={value}")])
            .collect()
    }
}

// Values may carry the authorization header
impl fmt::Debug for OneShotOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneShotOverrides")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

// --- Fetch ---

/// Options for `git fetch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub tags: bool,
    pub prune: bool,
    pub progress: bool,
    pub recurse_submodules: bool,
    /// Shallow fetch depth; `None` fetches full history.
    pub depth: Option<NonZeroU32>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            tags: true,
            prune: true,
            progress: true,
            recurse_submodules: false,
            depth: None,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub const fn with_depth(mut self, depth: Option<NonZeroU32>) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn to_args(&self, remote: &str) -> Vec<String> {
        let mut args = vec!["fetch".to_string()];
        if self.tags {
            args.push("--tags".to_string());
        }
        if self.prune {
            args.push("--prune".to_string());
        }
        if self.progress {
            args.push("--progress".to_string());
        }
        if !self.recurse_submodules {
            args.push("--no-recurse-submodules".to_string());
        }
        if let Some(depth) = self.depth {
            args.push(format!("--depth={depth}"));
        }
        args.push(remote.to_string());
        args
    }
}

// --- Checkout ---

/// Options for `git checkout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOptions {
    target: String,
    pub force: bool,
    pub progress: bool,
}

impl CheckoutOptions {
    /// Forced checkout of `target`, a commit id or branch name.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            force: true,
            progress: true,
        }
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["checkout".to_string()];
        if self.progress {
            args.push("--progress".to_string());
        }
        if self.force {
            args.push("--force".to_string());
        }
        args.push(self.target.clone());
        args
    }
}

// --- Submodules ---

/// How submodules are handled after checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmoduleMode {
    /// Submodules are left alone.
    #[default]
    None,
    /// Direct submodules only.
    Shallow,
    /// Nested submodules too.
    Recursive,
}

impl SubmoduleMode {
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Shallow => "true",
            Self::Recursive => "recursive",
        }
    }
}

impl fmt::Display for SubmoduleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmoduleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "false" => Ok(Self::None),
            "true" => Ok(Self::Shallow),
            "recursive" => Ok(Self::Recursive),
            other => Err(format!(
                "unknown submodule mode '{other}' (expected none, true, or recursive)"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for SubmoduleMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ModeVisitor;

        impl Visitor<'_> for ModeVisitor {
            type Value = SubmoduleMode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("one of none, true, recursive, or a boolean")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(if v {
                    SubmoduleMode::Shallow
                } else {
                    SubmoduleMode::None
                })
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(ModeVisitor)
    }
}

/// Options for `git submodule sync` and `git submodule update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmoduleOptions {
    pub mode: SubmoduleMode,
    pub depth: Option<NonZeroU32>,
}

impl SubmoduleOptions {
    #[must_use]
    pub const fn new(mode: SubmoduleMode, depth: Option<NonZeroU32>) -> Self {
        Self { mode, depth }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.mode.is_enabled()
    }

    const fn recursive(&self) -> bool {
        matches!(self.mode, SubmoduleMode::Recursive)
    }

    #[must_use]
    pub fn sync_args(&self) -> Vec<String> {
        let mut args = vec!["submodule".to_string(), "sync".to_string()];
        if self.recursive() {
            args.push("--recursive".to_string());
        }
        args
    }

    #[must_use]
    pub fn update_args(&self) -> Vec<String> {
        let mut args = vec![
            "submodule".to_string(),
            "update".to_string(),
            "--init".to_string(),
            "--force".to_string(),
        ];
        if self.recursive() {
            args.push("--recursive".to_string());
        }
        if let Some(depth) = self.depth {
            args.push(format!("--depth={depth}"));
        }
        args
    }
}
