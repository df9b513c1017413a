// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Authentication header construction and secret redaction.
//!
//! ```text
//! Credentials
//!   Basic { username, password } --> base64("user:pass")
//!   Token { token }              --> base64("x-access-token:token")
//!        |
//!        v
//! AuthContext::new(&credentials, &registry)
//!   derive AuthHeader { scheme = "basic", secret }
//!   register secret + raw password/token   <-- before any git call
//!        |
//!        v
//! "AUTHORIZATION: basic <secret>"  (one-shot http.extraheader)
//! ```
//!
//! Both credential forms produce a Basic header. Tokens are sent as the
//! password of the fixed `x-access-token` user, which GitHub and GitHub
//! Enterprise accept for PATs and app tokens alike.

pub mod redact;

#[cfg(test)]
mod tests;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;

pub use redact::{REDACTED, SecretRegistry};

/// Username paired with a token in the Basic encoding.
pub const TOKEN_USER: &str = "x-access-token";

/// Scheme used for every header this crate builds.
pub const AUTH_SCHEME: &str = "basic";

/// The active credential form.
#[derive(Debug, Clone)]
pub enum CredentialKind {
    /// Username and password.
    Basic {
        username: String,
        password: SecretString,
    },
    /// Personal access token.
    Token { token: SecretString },
}

/// Service-connection credentials. Exactly one form is active.
#[derive(Debug, Clone)]
pub struct Credentials {
    kind: CredentialKind,
    accept_untrusted_certs: bool,
}

impl Credentials {
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            kind: CredentialKind::Basic {
                username: username.into(),
                password: SecretString::from(password.into()),
            },
            accept_untrusted_certs: false,
        }
    }

    #[must_use]
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            kind: CredentialKind::Token {
                token: SecretString::from(token.into()),
            },
            accept_untrusted_certs: false,
        }
    }

    /// Picks the credential form from optional parts.
    ///
    /// Username and password win when both forms are present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoCredentials`] if neither a complete
    /// username/password pair nor a token is supplied.
    pub fn from_parts(
        username: Option<&str>,
        password: Option<&str>,
        token: Option<&str>,
    ) -> Result<Self, ConfigError> {
        match (present(username), present(password), present(token)) {
            (Some(user), Some(pass), _) => Ok(Self::basic(user, pass)),
            (_, _, Some(token)) => Ok(Self::token(token)),
            _ => Err(ConfigError::NoCredentials),
        }
    }

    #[must_use]
    pub const fn with_accept_untrusted_certs(mut self, accept: bool) -> Self {
        self.accept_untrusted_certs = accept;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> &CredentialKind {
        &self.kind
    }

    #[must_use]
    pub const fn accept_untrusted_certs(&self) -> bool {
        self.accept_untrusted_certs
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Derived authorization header.
#[derive(Debug, Clone)]
pub struct AuthHeader {
    secret: SecretString,
}

impl AuthHeader {
    fn from_credentials(credentials: &Credentials) -> Self {
        let raw = match credentials.kind() {
            CredentialKind::Basic { username, password } => {
                format!("{username}:{}", password.expose_secret())
            }
            CredentialKind::Token { token } => {
                format!("{TOKEN_USER}:{}", token.expose_secret())
            }
        };
        Self {
            secret: SecretString::from(STANDARD.encode(raw.as_bytes())),
        }
    }

    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        AUTH_SCHEME
    }

    /// The encoded credential. Never log this.
    #[must_use]
    pub fn secret_value(&self) -> &str {
        self.secret.expose_secret()
    }

    /// Full header line as git sends it (`AUTHORIZATION: basic <secret>`).
    #[must_use]
    pub fn header_line(&self) -> String {
        format!("AUTHORIZATION: {} {}", self.scheme(), self.secret_value())
    }
}

/// Authentication state for one run.
///
/// Constructing it registers every secret with the run's registry, so a
/// context that exists is a context whose secrets are already redacted.
#[derive(Debug, Clone)]
pub struct AuthContext {
    header: AuthHeader,
    accept_untrusted_certs: bool,
    registry: SecretRegistry,
}

impl AuthContext {
    #[must_use]
    pub fn new(credentials: &Credentials, registry: &SecretRegistry) -> Self {
        let header = AuthHeader::from_credentials(credentials);
        registry.register(header.secret_value());
        match credentials.kind() {
            CredentialKind::Basic { password, .. } => registry.register(password.expose_secret()),
            CredentialKind::Token { token } => registry.register(token.expose_secret()),
        }
        Self {
            header,
            accept_untrusted_certs: credentials.accept_untrusted_certs(),
            registry: registry.clone(),
        }
    }

    #[must_use]
    pub const fn header(&self) -> &AuthHeader {
        &self.header
    }

    #[must_use]
    pub const fn accept_untrusted_certs(&self) -> bool {
        self.accept_untrusted_certs
    }

    #[must_use]
    pub const fn registry(&self) -> &SecretRegistry {
        &self.registry
    }

    /// Scrubs every registered secret from `text`.
    #[must_use]
    pub fn redact<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        self.registry.redact(text)
    }
}
