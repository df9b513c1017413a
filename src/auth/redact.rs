// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-run secret registry.
//!
//! ```text
//! SecretRegistry (Arc, cloned into runner + sink)
//!   register("czpw")       rebuilds the matcher
//!   redact("... czpw ...") --> "... *** ..."
//!
//! matcher: Aho-Corasick, leftmost-longest, over the original text
//!   pass 1   "pp*"  --> "p***"      ("p*" registered)
//!   pass 2   "p***" --> "*****"     repeat until no secret remains
//! ```
//!
//! Matching is plain substring replacement, not header-aware. A secret is
//! only protected once registered, so registration happens before the
//! first git invocation.
//!
//! The marker can join with surrounding text to spell a secret that
//! contains `*`, so replacement repeats until the output is clean. Every
//! pass turns at least one non-`*` byte into `*`, so only a secret made
//! entirely of `*` can keep matching; a line that still matches after the
//! last pass is dropped whole.

use std::borrow::Cow;
use std::sync::{Arc, PoisonError, RwLock};

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use tracing::warn;

/// Marker substituted for every registered secret.
pub const REDACTED: &str = "***";

#[derive(Default)]
struct Secrets {
    values: Vec<String>,
    /// `None` while `values` is empty, or if the automaton failed to build.
    matcher: Option<AhoCorasick>,
}

impl Secrets {
    fn rebuild(&mut self) {
        match AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&self.values)
        {
            Ok(matcher) => self.matcher = Some(matcher),
            Err(e) => {
                warn!(error = %e, "cannot build secret matcher; output lines will be withheld");
                self.matcher = None;
            }
        }
    }
}

/// Set of secret strings scrubbed from every line that reaches a log.
///
/// Cloning is cheap and shares the underlying set, so one registry is
/// scoped to one pipeline run and handed to every consumer explicitly.
#[derive(Clone, Default)]
pub struct SecretRegistry {
    secrets: Arc<RwLock<Secrets>>,
}

fn replace_matches(matcher: &AhoCorasick, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    matcher.replace_all_with(text, &mut out, |_, _, dst| {
        dst.push_str(REDACTED);
        true
    });
    out
}

impl SecretRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a secret. Empty strings and duplicates are ignored.
    pub fn register(&self, secret: impl Into<String>) {
        let secret = secret.into();
        if secret.is_empty() {
            return;
        }
        let mut secrets = self.secrets.write().unwrap_or_else(PoisonError::into_inner);
        if secrets.values.contains(&secret) {
            return;
        }
        secrets.values.push(secret);
        secrets.rebuild();
    }

    /// Number of registered secrets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.secrets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces every registered secret in `text` with [`REDACTED`].
    ///
    /// The result never contains a registered secret. Borrows the input
    /// when nothing matched.
    #[must_use]
    pub fn redact<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let secrets = self.secrets.read().unwrap_or_else(PoisonError::into_inner);
        if secrets.values.is_empty() {
            return Cow::Borrowed(text);
        }
        let Some(matcher) = &secrets.matcher else {
            return Cow::Borrowed("");
        };
        if !matcher.is_match(text) {
            return Cow::Borrowed(text);
        }

        let mut out = replace_matches(matcher, text);
        for _ in 0..text.len() {
            if !matcher.is_match(&out) {
                return Cow::Owned(out);
            }
            out = replace_matches(matcher, &out);
        }
        if matcher.is_match(&out) {
            Cow::Borrowed("")
        } else {
            Cow::Owned(out)
        }
    }
}

impl std::fmt::Debug for SecretRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRegistry")
            .field("secrets", &self.len())
            .finish()
    }
}
