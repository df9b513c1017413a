// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! What to stage, where, and how.
//!
//! ```text
//! StagingPlan
//!   target        RepositoryTarget { host_url, identifier, local_path }
//!                   --> remote_url = host_url/identifier.git
//!   checkout      CheckoutRef: Commit(id) | Branch(name)
//!   remote        default "origin"
//!   fetch_depth   None = full history
//!   submodules    SubmoduleMode
//!   proxy         ProxyConfig (credentials embedded on use)
//!   credential_helper  Warn | Fail
//! ```

use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use bon::Builder;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::git::SubmoduleMode;

/// Remote repository and its local destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    host_url: String,
    identifier: String,
    local_path: PathBuf,
}

impl RepositoryTarget {
    pub fn new(
        host_url: impl Into<String>,
        identifier: impl Into<String>,
        local_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            host_url: host_url.into(),
            identifier: identifier.into(),
            local_path: local_path.into(),
        }
    }

    #[must_use]
    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// `host_url` + `identifier` + `.git`, joined by exactly one `/`.
    #[must_use]
    pub fn remote_url(&self) -> String {
        let host = self.host_url.trim_end_matches('/');
        let identifier = self.identifier.trim_start_matches('/');
        format!("{host}/{identifier}.git")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// The ref handed to `git checkout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutRef {
    /// An explicit commit id.
    Commit(String),
    /// A branch name, `refs/heads/` already stripped.
    Branch(String),
}

impl CheckoutRef {
    /// Prefers a non-empty commit id, else the branch.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if both are empty or absent.
    pub fn resolve(commit: Option<&str>, branch: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(commit) = non_empty(commit) {
            return Ok(Self::Commit(commit.to_string()));
        }
        non_empty(branch)
            .map(|branch| {
                let name = branch.strip_prefix("refs/heads/").unwrap_or(branch);
                Self::Branch(name.to_string())
            })
            .ok_or_else(|| ConfigError::missing("repository", "branch"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Commit(s) | Self::Branch(s) => s,
        }
    }

    /// The explicit commit id, if one was given.
    #[must_use]
    pub fn commit(&self) -> Option<&str> {
        match self {
            Self::Commit(id) => Some(id),
            Self::Branch(_) => None,
        }
    }
}

impl fmt::Display for CheckoutRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when a credential helper is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialHelperPolicy {
    /// Log a warning and continue.
    #[default]
    Warn,
    /// Abort with [`GitError::BlockedPromptRisk`](crate::error::GitError::BlockedPromptRisk).
    Fail,
}

impl fmt::Display for CredentialHelperPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warn => f.write_str("warn"),
            Self::Fail => f.write_str("fail"),
        }
    }
}

/// Ambient proxy.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    url: Url,
    username: Option<String>,
    password: Option<SecretString>,
}

impl ProxyConfig {
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self {
            url,
            username: None,
            password: None,
        }
    }

    #[must_use]
    pub fn with_credentials(
        mut self,
        username: Option<String>,
        password: Option<SecretString>,
    ) -> Self {
        self.username = username.filter(|u| !u.is_empty());
        self.password = password.filter(|p| !p.expose_secret().is_empty());
        self
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// The proxy URL, with credentials embedded when both are supplied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the URL cannot carry credentials.
    pub fn authenticated_url(&self) -> Result<Url, ConfigError> {
        let mut url = self.url.clone();
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            let cannot_embed = || ConfigError::invalid("proxy", "url", "cannot embed credentials");
            url.set_username(username).map_err(|()| cannot_embed())?;
            url.set_password(Some(password.expose_secret()))
                .map_err(|()| cannot_embed())?;
        }
        Ok(url)
    }

    /// Raw and percent-encoded password, for redaction.
    #[must_use]
    pub fn secrets(&self, authenticated: &Url) -> Vec<String> {
        let mut secrets = Vec::new();
        if let Some(password) = &self.password {
            secrets.push(password.expose_secret().to_string());
        }
        if let Some(encoded) = authenticated.password() {
            secrets.push(encoded.to_string());
        }
        secrets
    }
}

/// A validated staging request.
#[derive(Debug, Clone, Builder)]
pub struct StagingPlan {
    #[builder(setters(name = with_target))]
    target: RepositoryTarget,
    #[builder(setters(name = with_checkout))]
    checkout: CheckoutRef,
    #[builder(setters(name = with_remote), default = "origin".to_string(), into)]
    remote: String,
    #[builder(setters(name = with_fetch_depth))]
    fetch_depth: Option<NonZeroU32>,
    #[builder(setters(name = with_submodules), default)]
    submodules: SubmoduleMode,
    #[builder(setters(name = with_proxy))]
    proxy: Option<ProxyConfig>,
    #[builder(setters(name = with_credential_helper), default)]
    credential_helper: CredentialHelperPolicy,
}

impl StagingPlan {
    #[must_use]
    pub const fn target(&self) -> &RepositoryTarget {
        &self.target
    }

    #[must_use]
    pub const fn checkout(&self) -> &CheckoutRef {
        &self.checkout
    }

    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    #[must_use]
    pub const fn fetch_depth(&self) -> Option<NonZeroU32> {
        self.fetch_depth
    }

    #[must_use]
    pub const fn submodules(&self) -> SubmoduleMode {
        self.submodules
    }

    #[must_use]
    pub const fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }

    #[must_use]
    pub const fn credential_helper(&self) -> CredentialHelperPolicy {
        self.credential_helper
    }
}
