// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! [connection]  url, username, password, token, accept_untrusted_certs
//! [repository]  identifier, branch, commit, submodules, fetch_depth,
//!               path, remote, credential_helper
//! [proxy]       url, username, password
//! [tools]       git, agent_home
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::git::SubmoduleMode;
use crate::stage::CredentialHelperPolicy;

/// Shown in place of secret values.
pub const HIDDEN: &str = "[hidden]";

fn hide(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| HIDDEN)
}

/// Service connection.
#[derive(Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Host URL; the repository identifier is appended to it.
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    /// Disables TLS certificate verification for network operations.
    pub accept_untrusted_certs: bool,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &hide(self.password.as_ref()))
            .field("token", &hide(self.token.as_ref()))
            .field("accept_untrusted_certs", &self.accept_untrusted_certs)
            .finish()
    }
}

/// What to stage and where.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Repository identifier, e.g. `owner/name`.
    pub identifier: Option<String>,
    pub branch: Option<String>,
    /// Commit id; takes precedence over `branch`.
    pub commit: Option<String>,
    pub submodules: SubmoduleMode,
    /// Shallow fetch depth; 0 fetches full history.
    pub fetch_depth: u32,
    /// Destination directory.
    pub path: Option<PathBuf>,
    pub remote: String,
    pub credential_helper: CredentialHelperPolicy,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            identifier: None,
            branch: None,
            commit: None,
            submodules: SubmoduleMode::None,
            fetch_depth: 0,
            path: None,
            remote: "origin".to_string(),
            credential_helper: CredentialHelperPolicy::Warn,
        }
    }
}

/// Ambient HTTP proxy.
#[derive(Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxySettings {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxySettings")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &hide(self.password.as_ref()))
            .finish()
    }
}

/// Tool locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Git program name or path.
    pub git: PathBuf,
    /// CI agent home; its `externals` folder is searched for git.
    pub agent_home: Option<PathBuf>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: PathBuf::from("git"),
            agent_home: None,
        }
    }
}
