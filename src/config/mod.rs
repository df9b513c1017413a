// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gitstage.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. gitstage.toml (cwd, optional)
//! 3. --config FILE (in order)
//! 4. CI agent environment (INPUT_*, ENDPOINT_*, AGENT_*)
//! 5. GITSTAGE_* env vars
//! 6. --set / --destination
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITSTAGE_CONNECTION__URL=https://h/  → connection.url
//! GITSTAGE_REPOSITORY__FETCH_DEPTH=1   → repository.fetch_depth = 1
//! GITSTAGE_TOOLS__GIT=/opt/git/bin/git → tools.git
//! ```
//!
//! Loading only merges and deserializes; [`Config::staging_plan`] and
//! [`Config::credentials`] validate.

pub mod agent;
pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::Path;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

use crate::auth::Credentials;
use crate::error::{ConfigError, Result};
use crate::stage::{CheckoutRef, ProxyConfig, RepositoryTarget, StagingPlan};

use loader::ConfigLoader;
use types::{ConnectionConfig, HIDDEN, ProxySettings, RepositoryConfig, ToolsConfig};

/// Default configuration file, read from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gitstage.toml";

/// Prefix for `GITSTAGE_<SECTION>__<KEY>` variables.
pub const ENV_PREFIX: &str = "GITSTAGE";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub repository: RepositoryConfig,
    pub proxy: ProxySettings,
    pub tools: ToolsConfig,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitstage::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("gitstage.toml")
    ///     .with_env_prefix("GITSTAGE")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Service-connection credentials.
    ///
    /// Username and password win over a token when both are present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoCredentials`] if no complete form is present.
    pub fn credentials(&self) -> std::result::Result<Credentials, ConfigError> {
        let c = &self.connection;
        Credentials::from_parts(
            c.username.as_deref(),
            c.password.as_deref(),
            c.token.as_deref(),
        )
        .map(|creds| creds.with_accept_untrusted_certs(c.accept_untrusted_certs))
    }

    /// Validates the configuration into a [`StagingPlan`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the connection URL, repository
    /// identifier, destination path, or both branch and commit are
    /// missing, or if a URL is malformed.
    pub fn staging_plan(&self) -> std::result::Result<StagingPlan, ConfigError> {
        let host_url = present(self.connection.url.as_ref())
            .ok_or_else(|| ConfigError::missing("connection", "url"))?;
        let parsed = Url::parse(host_url)
            .map_err(|e| ConfigError::invalid("connection", "url", e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(
                "connection",
                "url",
                format!("unsupported scheme '{}' (expected http or https)", parsed.scheme()),
            ));
        }

        let identifier = present(self.repository.identifier.as_ref())
            .ok_or_else(|| ConfigError::missing("repository", "identifier"))?;
        let path = self
            .repository
            .path
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| ConfigError::missing("repository", "path"))?;

        let checkout = CheckoutRef::resolve(
            self.repository.commit.as_deref(),
            self.repository.branch.as_deref(),
        )?;

        Ok(StagingPlan::builder()
            .with_target(RepositoryTarget::new(host_url, identifier, path))
            .with_checkout(checkout)
            .with_remote(self.repository.remote.clone())
            .maybe_with_fetch_depth(NonZeroU32::new(self.repository.fetch_depth))
            .with_submodules(self.repository.submodules)
            .maybe_with_proxy(self.proxy_config()?)
            .with_credential_helper(self.repository.credential_helper)
            .build())
    }

    fn proxy_config(&self) -> std::result::Result<Option<ProxyConfig>, ConfigError> {
        let Some(raw) = present(self.proxy.url.as_ref()) else {
            return Ok(None);
        };
        let url =
            Url::parse(raw).map_err(|e| ConfigError::invalid("proxy", "url", e.to_string()))?;
        Ok(Some(ProxyConfig::new(url).with_credentials(
            self.proxy.username.clone(),
            self.proxy.password.clone().map(SecretString::from),
        )))
    }

    /// Format configuration options for display.
    ///
    /// Secrets are shown as `[hidden]`. Output is ordered by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_connection_options(&mut options);
        self.format_repository_options(&mut options);
        self.format_proxy_options(&mut options);
        self.format_tools_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_connection_options(&self, options: &mut BTreeMap<String, String>) {
        let c = &self.connection;
        options.insert("connection.url".into(), c.url.clone().unwrap_or_default());
        options.insert(
            "connection.username".into(),
            c.username.clone().unwrap_or_default(),
        );
        if c.password.is_some() {
            options.insert("connection.password".into(), HIDDEN.into());
        }
        if c.token.is_some() {
            options.insert("connection.token".into(), HIDDEN.into());
        }
        options.insert(
            "connection.accept_untrusted_certs".into(),
            c.accept_untrusted_certs.to_string(),
        );
    }

    fn format_repository_options(&self, options: &mut BTreeMap<String, String>) {
        let r = &self.repository;
        options.insert(
            "repository.identifier".into(),
            r.identifier.clone().unwrap_or_default(),
        );
        options.insert(
            "repository.branch".into(),
            r.branch.clone().unwrap_or_default(),
        );
        options.insert(
            "repository.commit".into(),
            r.commit.clone().unwrap_or_default(),
        );
        options.insert("repository.submodules".into(), r.submodules.to_string());
        options.insert("repository.fetch_depth".into(), r.fetch_depth.to_string());
        options.insert(
            "repository.path".into(),
            r.path
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("repository.remote".into(), r.remote.clone());
        options.insert(
            "repository.credential_helper".into(),
            r.credential_helper.to_string(),
        );
    }

    fn format_proxy_options(&self, options: &mut BTreeMap<String, String>) {
        let p = &self.proxy;
        if let Some(url) = &p.url {
            options.insert("proxy.url".into(), url.clone());
        }
        if let Some(username) = &p.username {
            options.insert("proxy.username".into(), username.clone());
        }
        if p.password.is_some() {
            options.insert("proxy.password".into(), HIDDEN.into());
        }
    }

    fn format_tools_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("tools.git".into(), self.tools.git.display().to_string());
        if let Some(home) = &self.tools.agent_home {
            options.insert("tools.agent_home".into(), home.display().to_string());
        }
    }
}
