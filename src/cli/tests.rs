// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use crate::cli::{Cli, Command};
use clap::Parser;

#[test]
fn test_default_command_is_stage() {
    let cli = Cli::try_parse_from(["gitstage"]).unwrap();
    assert_eq!(cli.command, None);
    assert_eq!(cli.command(), Command::Stage);
}

#[test]
fn test_parse_commands() {
    let parsed: Vec<_> = ["stage", "options", "version"]
        .into_iter()
        .map(|name| Cli::try_parse_from(["gitstage", name]).unwrap().command())
        .collect();
    assert_eq!(
        parsed,
        vec![Command::Stage, Command::Options, Command::Version]
    );
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "gitstage",
        "-c",
        "base.toml",
        "--config",
        "ci.toml",
        "-l",
        "4",
        "--file-log-level",
        "5",
        "--log-file",
        "logs/stage.log",
        "-d",
        "/work/s",
        "--no-default-config",
        "--no-color",
        "--no-git-output",
        "stage",
    ])
    .unwrap();

    let g = &cli.global;
    assert_eq!(
        g.configs,
        vec![PathBuf::from("base.toml"), PathBuf::from("ci.toml")]
    );
    assert_eq!(g.log_level, Some(4));
    assert_eq!(g.file_log_level, Some(5));
    assert_eq!(g.log_file, Some(PathBuf::from("logs/stage.log")));
    assert_eq!(g.destination, Some(PathBuf::from("/work/s")));
    assert!(g.no_default_config);
    assert!(g.no_color);
    assert!(g.no_git_output);
}

#[test]
fn test_parse_set_options() {
    let cli = Cli::try_parse_from([
        "gitstage",
        "-s",
        "repository.branch=main",
        "--set",
        "connection.url=https://h/?a=b",
        "options",
    ])
    .unwrap();

    insta::assert_debug_snapshot!(cli.global.options, @r#"
    [
        (
            "repository.branch",
            "main",
        ),
        (
            "connection.url",
            "https://h/?a=b",
        ),
    ]
    "#);
}

#[test]
fn test_parse_set_rejects_missing_equals() {
    assert!(Cli::try_parse_from(["gitstage", "-s", "repository.branch"]).is_err());
    assert!(Cli::try_parse_from(["gitstage", "-s", "=main"]).is_err());
}

#[test]
fn test_parse_log_level_range() {
    assert!(Cli::try_parse_from(["gitstage", "-l", "7"]).is_err());
    assert!(Cli::try_parse_from(["gitstage", "-l", "0"]).is_ok());
}

#[test]
fn test_destination_overrides_set() {
    let cli = Cli::try_parse_from([
        "gitstage",
        "-s",
        "repository.path=/from/set",
        "-d",
        "/from/flag",
    ])
    .unwrap();

    let overrides = cli.global.to_config_overrides();
    assert_eq!(
        overrides.last(),
        Some(&("repository.path".to_string(), "/from/flag".to_string()))
    );
    assert_eq!(overrides.len(), 2);
}
