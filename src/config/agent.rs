// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CI agent environment as a configuration source.
//!
//! ```text
//! INPUT_CONNECTION=<id>
//!   ENDPOINT_URL_<id>                          --> connection.url
//!   ENDPOINT_AUTH_PARAMETER_<id>_USERNAME      --> connection.username
//!   ENDPOINT_AUTH_PARAMETER_<id>_PASSWORD      --> connection.password
//!   ENDPOINT_AUTH_PARAMETER_<id>_APITOKEN      --> connection.token
//!   ENDPOINT_DATA_<id>_ACCEPTUNTRUSTEDCERTS    --> connection.accept_untrusted_certs
//! INPUT_DEFINITION     --> repository.identifier
//! INPUT_BRANCH         --> repository.branch
//! INPUT_VERSION        --> repository.commit
//! INPUT_DOWNLOADPATH   --> repository.path
//! INPUT_SUBMODULES     --> repository.submodules
//! INPUT_FETCHDEPTH     --> repository.fetch_depth
//! AGENT_PROXYURL       --> proxy.url
//! AGENT_PROXYUSERNAME  --> proxy.username
//! AGENT_PROXYPASSWORD  --> proxy.password
//! AGENT_HOMEDIRECTORY  --> tools.agent_home
//! ```
//!
//! Empty variables are ignored. Endpoint ids are looked up as given, then
//! upper-cased.

use std::collections::BTreeMap;

use config::{Map, Source, Value};

const ORIGIN: &str = "agent environment";

const INPUT_KEYS: &[(&str, &str)] = &[
    ("INPUT_DEFINITION", "repository.identifier"),
    ("INPUT_BRANCH", "repository.branch"),
    ("INPUT_VERSION", "repository.commit"),
    ("INPUT_DOWNLOADPATH", "repository.path"),
    ("INPUT_SUBMODULES", "repository.submodules"),
    ("INPUT_FETCHDEPTH", "repository.fetch_depth"),
    ("AGENT_PROXYURL", "proxy.url"),
    ("AGENT_PROXYUSERNAME", "proxy.username"),
    ("AGENT_PROXYPASSWORD", "proxy.password"),
    ("AGENT_HOMEDIRECTORY", "tools.agent_home"),
];

/// `(prefix, suffix, key)`; the connection id goes between prefix and suffix.
const ENDPOINT_KEYS: &[(&str, &str, &str)] = &[
    ("ENDPOINT_URL_", "", "connection.url"),
    ("ENDPOINT_AUTH_PARAMETER_", "_USERNAME", "connection.username"),
    ("ENDPOINT_AUTH_PARAMETER_", "_PASSWORD", "connection.password"),
    ("ENDPOINT_AUTH_PARAMETER_", "_APITOKEN", "connection.token"),
    (
        "ENDPOINT_DATA_",
        "_ACCEPTUNTRUSTEDCERTS",
        "connection.accept_untrusted_certs",
    ),
];

/// Snapshot of the agent's variables, read as configuration.
#[derive(Debug, Clone, Default)]
pub struct AgentEnvironment {
    vars: BTreeMap<String, String>,
}

impl AgentEnvironment {
    /// Snapshots the current process environment, skipping non-UTF-8 entries.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    fn endpoint(&self, prefix: &str, suffix: &str, id: &str) -> Option<&str> {
        self.get(&format!("{prefix}{id}{suffix}"))
            .or_else(|| self.get(&format!("{prefix}{}{suffix}", id.to_ascii_uppercase())))
    }

    /// Configuration keys this environment provides, with their values.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<&'static str, String> {
        let mut entries = BTreeMap::new();

        for &(var, key) in INPUT_KEYS {
            if let Some(value) = self.get(var) {
                entries.insert(key, value.to_string());
            }
        }

        if let Some(id) = self.get("INPUT_CONNECTION") {
            for &(prefix, suffix, key) in ENDPOINT_KEYS {
                if let Some(value) = self.endpoint(prefix, suffix, id) {
                    entries.insert(key, value.to_string());
                }
            }
        }

        entries
    }
}

impl Source for AgentEnvironment {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
        let origin = ORIGIN.to_string();
        Ok(self
            .entries()
            .into_iter()
            .map(|(key, value)| (key.to_string(), Value::new(Some(&origin), value)))
            .collect())
    }
}
