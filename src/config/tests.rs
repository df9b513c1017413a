// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};

use super::agent::AgentEnvironment;
use super::loader::ConfigLoader;
use super::Config;
use crate::auth::CredentialKind;
use crate::error::ConfigError;
use crate::git::SubmoduleMode;
use crate::stage::{CheckoutRef, CredentialHelperPolicy};

const MINIMAL: &str = r#"
[connection]
url = "https://ghe.example.com/"
token = "tok"

[repository]
identifier = "team/project"
branch = "main"
path = "/work/src"
"#;

fn minimal() -> Config {
    Config::parse(MINIMAL).expect("minimal config should parse")
}

fn agent(vars: &[(&str, &str)]) -> AgentEnvironment {
    AgentEnvironment::from_vars(vars.iter().copied())
}

// =============================================================================
// Defaults and parsing
// =============================================================================

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.repository.remote, "origin");
    assert_eq!(config.repository.fetch_depth, 0);
    assert_eq!(config.repository.submodules, SubmoduleMode::None);
    assert_eq!(config.repository.credential_helper, CredentialHelperPolicy::Warn);
    assert_eq!(config.tools.git, PathBuf::from("git"));
    assert!(!config.connection.accept_untrusted_certs);
}

#[test]
fn test_config_parse_full() {
    let config = Config::parse(
        r#"
[connection]
url = "https://ghe.example.com"
username = "builder"
password = "pw"
accept_untrusted_certs = true

[repository]
identifier = "team/project"
commit = "abc123"
submodules = "Recursive"
fetch_depth = 10
path = "/work/src"
remote = "upstream"
credential_helper = "fail"

[proxy]
url = "http://proxy:3128"

[tools]
git = "/usr/local/bin/git"
agent_home = "/agent"
"#,
    )
    .expect("config should parse");

    assert!(config.connection.accept_untrusted_certs);
    assert_eq!(config.repository.submodules, SubmoduleMode::Recursive);
    assert_eq!(config.repository.fetch_depth, 10);
    assert_eq!(config.repository.credential_helper, CredentialHelperPolicy::Fail);
    assert_eq!(config.tools.agent_home.as_deref(), Some(Path::new("/agent")));
}

#[test]
fn test_submodules_accepts_boolean() {
    let config = Config::parse("[repository]\nsubmodules = true").expect("should parse");
    assert_eq!(config.repository.submodules, SubmoduleMode::Shallow);
}

#[test]
fn test_deny_unknown_fields_in_section() {
    let result = Config::parse("[repository]\nidentifer = \"typo\"");
    let err = format!("{:#}", result.unwrap_err());
    assert!(err.contains("identifer"), "{err}");
}

#[test]
fn test_invalid_type_is_reported() {
    let result = Config::parse("[repository]\nfetch_depth = \"deep\"");
    assert!(result.is_err(), "build should fail with type mismatch");
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_staging_plan_minimal() {
    let plan = minimal().staging_plan().expect("plan should validate");

    assert_eq!(
        plan.target().remote_url(),
        "https://ghe.example.com/team/project.git"
    );
    assert_eq!(plan.target().local_path(), Path::new("/work/src"));
    assert_eq!(plan.checkout(), &CheckoutRef::Branch("main".to_string()));
    assert_eq!(plan.remote(), "origin");
    assert_eq!(plan.fetch_depth(), None);
    assert!(plan.proxy().is_none());
}

#[test]
fn test_staging_plan_commit_wins() {
    let mut config = minimal();
    config.repository.commit = Some("abc123".to_string());
    config.repository.fetch_depth = 1;
    let plan = config.staging_plan().expect("plan should validate");

    assert_eq!(plan.checkout().commit(), Some("abc123"));
    assert_eq!(plan.fetch_depth().map(std::num::NonZeroU32::get), Some(1));
}

#[test]
fn test_staging_plan_missing_keys() {
    let cases: [(&str, fn(&mut Config)); 4] = [
        ("connection.url", |c| c.connection.url = None),
        ("repository.identifier", |c| c.repository.identifier = Some(" ".into())),
        ("repository.path", |c| c.repository.path = None),
        ("repository.branch", |c| c.repository.branch = None),
    ];

    for (expected, clear) in cases {
        let mut config = minimal();
        clear(&mut config);
        match config.staging_plan() {
            Err(ConfigError::MissingKey { section, key }) => {
                assert_eq!(format!("{section}.{key}"), expected);
            }
            other => panic!("{expected}: unexpected result {other:?}"),
        }
    }
}

#[test]
fn test_staging_plan_rejects_non_http_scheme() {
    let mut config = minimal();
    config.connection.url = Some("ssh://ghe.example.com/".to_string());
    let err = config.staging_plan().unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'url' in section '[connection]': unsupported scheme 'ssh' (expected http or https)"
    );
}

#[test]
fn test_staging_plan_with_proxy() {
    let mut config = minimal();
    config.proxy.url = Some("http://proxy:3128".to_string());
    config.proxy.username = Some("agent".to_string());
    config.proxy.password = Some("pw".to_string());
    let plan = config.staging_plan().expect("plan should validate");

    let proxy = plan.proxy().expect("proxy configured");
    let url = proxy.authenticated_url().expect("should embed");
    assert_eq!(url.as_str(), "http://agent:pw@proxy:3128/");
}

#[test]
fn test_staging_plan_bad_proxy_url() {
    let mut config = minimal();
    config.proxy.url = Some("not a url".to_string());
    let err = config.staging_plan().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref section, .. } if section == "proxy"));
}

#[test]
fn test_credentials_precedence() {
    let mut config = minimal();
    config.connection.username = Some("builder".to_string());
    config.connection.password = Some("pw".to_string());
    config.connection.accept_untrusted_certs = true;

    let creds = config.credentials().expect("credentials present");
    assert!(matches!(creds.kind(), CredentialKind::Basic { username, .. } if username == "builder"));
    assert!(creds.accept_untrusted_certs());
}

#[test]
fn test_credentials_missing() {
    let mut config = minimal();
    config.connection.token = None;
    config.connection.username = Some("builder".to_string());
    assert!(matches!(config.credentials(), Err(ConfigError::NoCredentials)));
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn test_format_options_hides_sensitive() {
    let mut config = minimal();
    config.proxy.password = Some("proxypw".to_string());
    let options = config
        .format_options()
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n");

    assert!(!options.contains("proxypw"));
    insta::assert_snapshot!(options, @r"
    connection.accept_untrusted_certs = false
    connection.token                  = [hidden]
    connection.url                    = https://ghe.example.com/
    connection.username               =
    proxy.password                    = [hidden]
    repository.branch                 = main
    repository.commit                 =
    repository.credential_helper      = warn
    repository.fetch_depth            = 0
    repository.identifier             = team/project
    repository.path                   = /work/src
    repository.remote                 = origin
    repository.submodules             = none
    tools.git                         = git
    ");
}

#[test]
fn test_debug_hides_secrets() {
    let mut config = minimal();
    config.connection.password = Some("hunter2".to_string());
    let debug = format!("{config:?}");
    assert!(!debug.contains("hunter2"));
    assert!(!debug.contains("\"tok\""));
}

// =============================================================================
// Loader
// =============================================================================

#[test]
fn test_config_loader_layered_sources() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().expect("failed to create temp file");
    writeln!(file, "{MINIMAL}").expect("failed to write");

    let config = ConfigLoader::new()
        .add_toml_file(file.path())
        .add_toml_str("[repository]\nbranch = \"develop\"")
        .build()
        .expect("build should succeed");

    assert_eq!(config.repository.branch.as_deref(), Some("develop"));
    assert_eq!(config.repository.identifier.as_deref(), Some("team/project"));
}

#[test]
fn test_config_loader_set_override() {
    let config = ConfigLoader::new()
        .add_toml_str(MINIMAL)
        .set("repository.path", "/elsewhere")
        .expect("set should succeed")
        .build()
        .expect("build should succeed");

    assert_eq!(config.repository.path.as_deref(), Some(Path::new("/elsewhere")));
}

#[test]
fn test_config_loader_add_toml_file_not_found() {
    let result = ConfigLoader::new()
        .add_toml_file("/nonexistent/gitstage.toml")
        .build();
    assert!(result.is_err(), "required file must exist");
}

#[test]
fn test_config_loader_optional_only_tracks_existing() {
    let loader = ConfigLoader::new().add_toml_file_optional("/nonexistent/gitstage.toml");
    assert!(loader.loaded_files().is_empty());
    loader.build().expect("missing optional file is fine");
}

#[test]
fn test_config_loader_format_loaded_files() {
    let loader = ConfigLoader::new().add_toml_str(MINIMAL);
    insta::assert_snapshot!(loader.format_loaded_files().join("\n"), @"1. [string] <string>");
}

#[test]
fn test_config_loader_with_env_prefix() {
    // SAFETY: the variable name is unique to this test
    unsafe {
        std::env::set_var("GSTESTENV_REPOSITORY__COMMIT", "0123456789");
        std::env::set_var("GSTESTENV_REPOSITORY__FETCH_DEPTH", "3");
    }

    let config = ConfigLoader::new()
        .add_toml_str(MINIMAL)
        .with_env_prefix("GSTESTENV")
        .build()
        .expect("build should succeed");

    // SAFETY: same as above
    unsafe {
        std::env::remove_var("GSTESTENV_REPOSITORY__COMMIT");
        std::env::remove_var("GSTESTENV_REPOSITORY__FETCH_DEPTH");
    }

    assert_eq!(config.repository.commit.as_deref(), Some("0123456789"));
    assert_eq!(config.repository.fetch_depth, 3);
}

// =============================================================================
// Agent environment
// =============================================================================

#[test]
fn test_agent_environment_entries() {
    let env = agent(&[
        ("INPUT_CONNECTION", "ghe1"),
        ("ENDPOINT_URL_GHE1", "https://ghe.example.com/"),
        ("ENDPOINT_AUTH_PARAMETER_GHE1_APITOKEN", "tok"),
        ("ENDPOINT_DATA_GHE1_ACCEPTUNTRUSTEDCERTS", "true"),
        ("INPUT_DEFINITION", "team/project"),
        ("INPUT_BRANCH", "refs/heads/main"),
        ("INPUT_VERSION", ""),
        ("INPUT_DOWNLOADPATH", "/work/src"),
        ("AGENT_PROXYURL", "http://proxy:3128"),
        ("UNRELATED", "x"),
    ]);

    let entries = env.entries();
    let listing: Vec<String> = entries.iter().map(|(k, v)| format!("{k}={v}")).collect();
    insta::assert_snapshot!(listing.join("\n"), @r"
    connection.accept_untrusted_certs=true
    connection.token=tok
    connection.url=https://ghe.example.com/
    proxy.url=http://proxy:3128
    repository.branch=refs/heads/main
    repository.identifier=team/project
    repository.path=/work/src
    ");
}

#[test]
fn test_agent_environment_exact_id_first() {
    let env = agent(&[
        ("INPUT_CONNECTION", "Ghe"),
        ("ENDPOINT_URL_Ghe", "https://exact.example.com/"),
        ("ENDPOINT_URL_GHE", "https://upper.example.com/"),
    ]);
    assert_eq!(
        env.entries().get("connection.url").map(String::as_str),
        Some("https://exact.example.com/")
    );
}

#[test]
fn test_agent_environment_without_connection_has_no_endpoint() {
    let env = agent(&[("ENDPOINT_URL_GHE1", "https://ghe.example.com/")]);
    assert!(env.entries().is_empty());
}

#[test]
fn test_agent_environment_as_source() {
    let env = agent(&[
        ("INPUT_CONNECTION", "ghe1"),
        ("ENDPOINT_URL_GHE1", "https://ghe.example.com/"),
        ("ENDPOINT_AUTH_PARAMETER_GHE1_USERNAME", "builder"),
        ("ENDPOINT_AUTH_PARAMETER_GHE1_PASSWORD", "pw"),
        ("ENDPOINT_DATA_GHE1_ACCEPTUNTRUSTEDCERTS", "True"),
        ("INPUT_DEFINITION", "team/project"),
        ("INPUT_VERSION", "abc123"),
        ("INPUT_DOWNLOADPATH", "/work/src"),
        ("INPUT_SUBMODULES", "Recursive"),
        ("INPUT_FETCHDEPTH", "1"),
    ]);

    let config = ConfigLoader::new()
        .add_toml_str("[repository]\nbranch = \"main\"\nidentifier = \"from/file\"")
        .with_agent_environment(env)
        .build()
        .expect("build should succeed");

    assert!(config.connection.accept_untrusted_certs);
    assert_eq!(config.repository.submodules, SubmoduleMode::Recursive);
    assert_eq!(config.repository.fetch_depth, 1);
    assert_eq!(config.repository.identifier.as_deref(), Some("team/project"));

    let plan = config.staging_plan().expect("plan should validate");
    assert_eq!(plan.checkout().commit(), Some("abc123"));
    let creds = config.credentials().expect("credentials present");
    assert!(matches!(creds.kind(), CredentialKind::Basic { .. }));
}
