// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::{AuthContext, CredentialKind, Credentials, REDACTED, SecretRegistry};
use crate::error::ConfigError;

#[test]
fn test_basic_credentials_encode_user_and_password() {
    let registry = SecretRegistry::new();
    let auth = AuthContext::new(&Credentials::basic("u", "p"), &registry);

    assert_eq!(auth.header().scheme(), "basic");
    assert_eq!(auth.header().secret_value(), STANDARD.encode("u:p"));
    insta::assert_snapshot!(auth.header().header_line(), @"AUTHORIZATION: basic dTpw");
}

#[test]
fn test_token_credentials_use_fixed_user() {
    let registry = SecretRegistry::new();
    let auth = AuthContext::new(&Credentials::token("t"), &registry);

    assert_eq!(auth.header().scheme(), "basic");
    assert_eq!(
        auth.header().secret_value(),
        STANDARD.encode("x-access-token:t")
    );
}

#[test]
fn test_token_secret_never_survives_redaction() {
    let registry = SecretRegistry::new();
    let auth = AuthContext::new(&Credentials::token("ghp_abc123"), &registry);
    let secret = auth.header().secret_value().to_string();

    let line = format!("git -c http.extraheader={} fetch", auth.header().header_line());
    let redacted = auth.redact(&line);
    assert!(!redacted.contains(&secret), "{redacted}");
    assert!(redacted.contains(REDACTED));

    let raw = auth.redact("remote said: ghp_abc123 is invalid");
    assert!(!raw.contains("ghp_abc123"), "{raw}");
}

#[test]
fn test_redact_removes_every_occurrence() {
    let registry = SecretRegistry::new();
    registry.register("s3cr3t");

    let text = "s3cr3t at start, s3cr3t in middle, ends with s3cr3t";
    let redacted = registry.redact(text);

    assert_eq!(redacted.matches("s3cr3t").count(), 0);
    insta::assert_snapshot!(redacted, @"*** at start, *** in middle, ends with ***");
}

#[test]
fn test_redact_prefers_longest_secret() {
    let registry = SecretRegistry::new();
    registry.register("abc");
    registry.register("xxabcxx");

    insta::assert_snapshot!(registry.redact("token=xxabcxx"), @"token=***");
}

#[test]
fn test_redact_marker_cannot_spell_a_secret() {
    let registry = SecretRegistry::new();
    registry.register("p*");

    let redacted = registry.redact("pp*");
    assert!(!redacted.contains("p*"), "{redacted}");
    insta::assert_snapshot!(redacted, @"*****");
}

#[test]
fn test_redact_overlapping_secrets() {
    let registry = SecretRegistry::new();
    registry.register("abc");
    registry.register("bcd");

    let redacted = registry.redact("xabcd");
    assert!(!redacted.contains("abc") && !redacted.contains("bcd"), "{redacted}");
    insta::assert_snapshot!(redacted, @"x***d");
}

#[test]
fn test_redact_withholds_line_made_of_marker() {
    let registry = SecretRegistry::new();
    registry.register("**");
    assert_eq!(registry.redact("pass=**"), "");
    assert_eq!(registry.redact("clean"), "clean");
}

#[test]
fn test_redact_borrows_when_clean() {
    let registry = SecretRegistry::new();
    registry.register("hidden");
    assert!(matches!(
        registry.redact("nothing to see"),
        std::borrow::Cow::Borrowed(_)
    ));
}

#[test]
fn test_registry_ignores_empty_and_duplicate_secrets() {
    let registry = SecretRegistry::new();
    registry.register("");
    registry.register("dup");
    registry.register("dup");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.redact("plain text"), "plain text");
}

#[test]
fn test_context_registers_before_use() {
    let registry = SecretRegistry::new();
    assert!(registry.is_empty());
    let _auth = AuthContext::new(&Credentials::basic("user", "pw"), &registry);
    // Encoded header plus raw password
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_from_parts_prefers_basic() {
    let creds = Credentials::from_parts(Some("u"), Some("p"), Some("t")).unwrap();
    assert!(matches!(creds.kind(), CredentialKind::Basic { .. }));

    let creds = Credentials::from_parts(Some("u"), None, Some("t")).unwrap();
    assert!(matches!(creds.kind(), CredentialKind::Token { .. }));

    let err = Credentials::from_parts(Some("u"), Some(""), None).unwrap_err();
    assert!(matches!(err, ConfigError::NoCredentials));
}

#[test]
fn test_from_parts_skips_empty_values() {
    let user = String::new();
    let token = String::from("t");
    let creds = Credentials::from_parts(Some(&user), Some("p"), Some(&token)).unwrap();
    assert!(matches!(creds.kind(), CredentialKind::Token { .. }));

    let err = Credentials::from_parts(None, None, Some("")).unwrap_err();
    assert!(matches!(err, ConfigError::NoCredentials));
}

#[test]
fn test_credentials_debug_hides_secret() {
    let creds = Credentials::basic("user", "hunter2");
    let debug = format!("{creds:?}");
    assert!(!debug.contains("hunter2"), "{debug}");
}
