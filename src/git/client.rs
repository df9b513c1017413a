// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations, one subprocess each.
//!
//! ```text
//! version          git version
//! init             git init
//! add_remote       git remote add <name> <url>
//! set_remote_url   git remote set-url <name> <url>
//! add_config       git config <key> <value>
//! get_config       git config --get <key>          (exit 1 = unset)
//! fetch            git [-c ..] fetch ...           (streamed)
//! checkout         git [-c ..] checkout ...        (streamed)
//! submodule_sync   git submodule sync ...
//! submodule_update git [-c ..] submodule update ... (streamed)
//! latest_commit    git log -1 --format=%H
//! ```

use tracing::debug;

use super::options::{CheckoutOptions, FetchOptions, OneShotOverrides, SubmoduleOptions};
use super::runner::CommandRunner;
use crate::core::process::builder::ExecutionResult;
use crate::error::{GitError, StageResult};

/// Exit code `git config --get` uses for a key that is not set.
const CONFIG_KEY_UNSET: i32 = 1;

fn to_args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

fn with_overrides(overrides: &OneShotOverrides, mut args: Vec<String>) -> Vec<String> {
    let mut full = overrides.to_args();
    full.append(&mut args);
    full
}

/// Typed git operations over a [`CommandRunner`].
#[derive(Debug)]
pub struct RepositoryClient<R> {
    runner: R,
}

impl<R: CommandRunner> RepositoryClient<R> {
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }

    pub const fn runner(&self) -> &R {
        &self.runner
    }

    async fn capture(&self, operation: &str, args: &[String]) -> StageResult<ExecutionResult> {
        let result = self.runner.run_captured(args).await?;
        if result.success() {
            Ok(result)
        } else {
            Err(GitError::failed(operation, result.exit_code()).into())
        }
    }

    async fn stream(&self, operation: &str, args: &[String]) -> StageResult<()> {
        match self.runner.run_streamed(args).await? {
            0 => Ok(()),
            code => Err(GitError::failed(operation, code).into()),
        }
    }

    /// Returns the first line of `git version`.
    ///
    /// # Errors
    ///
    /// Fails if git exits non-zero.
    pub async fn version(&self) -> StageResult<String> {
        let result = self.capture("version", &to_args(["version"])).await?;
        Ok(result.first_line().to_string())
    }

    /// Initializes a repository in the working directory.
    ///
    /// # Errors
    ///
    /// Fails if git exits non-zero.
    pub async fn init(&self) -> StageResult<()> {
        self.capture("init", &to_args(["init"])).await.map(drop)
    }

    /// # Errors
    ///
    /// Fails if git exits non-zero, e.g. when the remote already exists.
    pub async fn add_remote(&self, name: &str, url: &str) -> StageResult<()> {
        self.capture("remote add", &to_args(["remote", "add", name, url]))
            .await
            .map(drop)
    }

    /// # Errors
    ///
    /// Fails if git exits non-zero.
    pub async fn set_remote_url(&self, name: &str, url: &str) -> StageResult<()> {
        self.capture("remote set-url", &to_args(["remote", "set-url", name, url]))
            .await
            .map(drop)
    }

    /// Persists a configuration entry in the repository.
    ///
    /// # Errors
    ///
    /// Fails if git exits non-zero.
    pub async fn add_config(&self, key: &str, value: &str) -> StageResult<()> {
        self.capture("config", &to_args(["config", key, value]))
            .await
            .map(drop)
    }

    /// Reads a configuration entry; `None` when unset.
    ///
    /// # Errors
    ///
    /// Fails on any exit code other than 0 or "key unset".
    pub async fn get_config(&self, key: &str) -> StageResult<Option<String>> {
        let result = self
            .runner
            .run_captured(&to_args(["config", "--get", key]))
            .await?;
        match result.exit_code() {
            0 => {
                let value = result.first_line();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            CONFIG_KEY_UNSET => Ok(None),
            code => Err(GitError::failed("config --get", code).into()),
        }
    }

    /// Fetches from `remote`, progress relayed as it arrives.
    ///
    /// # Errors
    ///
    /// Fails if git exits non-zero.
    pub async fn fetch(
        &self,
        overrides: &OneShotOverrides,
        options: &FetchOptions,
        remote: &str,
    ) -> StageResult<()> {
        let args = with_overrides(overrides, options.to_args(remote));
        self.stream("fetch", &args).await
    }

    /// # Errors
    ///
    /// Fails if git exits non-zero.
    pub async fn checkout(
        &self,
        overrides: &OneShotOverrides,
        options: &CheckoutOptions,
    ) -> StageResult<()> {
        let args = with_overrides(overrides, options.to_args());
        self.stream("checkout", &args).await
    }

    /// # Errors
    ///
    /// Fails if git exits non-zero.
    pub async fn submodule_sync(&self, options: &SubmoduleOptions) -> StageResult<()> {
        self.capture("submodule sync", &options.sync_args())
            .await
            .map(drop)
    }

    /// # Errors
    ///
    /// Fails if git exits non-zero.
    pub async fn submodule_update(
        &self,
        overrides: &OneShotOverrides,
        options: &SubmoduleOptions,
    ) -> StageResult<()> {
        let args = with_overrides(overrides, options.update_args());
        self.stream("submodule update", &args).await
    }

    /// Hash of the commit currently checked out.
    ///
    /// # Errors
    ///
    /// Fails if git exits non-zero, prints nothing, or prints something
    /// other than a full SHA-1 or SHA-256 hex id (e.g. a redacted line).
    pub async fn latest_commit(&self) -> StageResult<String> {
        let result = self
            .capture("log", &to_args(["log", "-1", "--format=%H"]))
            .await?;
        let commit = result.first_line();
        if commit.is_empty() {
            return Err(GitError::EmptyOutput {
                operation: "log".to_string(),
            }
            .into());
        }
        if !is_object_id(commit) {
            return Err(GitError::UnexpectedOutput {
                operation: "log".to_string(),
                output: commit.to_string(),
            }
            .into());
        }
        debug!(commit, "resolved latest commit");
        Ok(commit.to_string())
    }
}

/// Full object id: 40 hex digits (SHA-1) or 64 (SHA-256).
fn is_object_id(text: &str) -> bool {
    matches!(text.len(), 40 | 64) && text.bytes().all(|b| b.is_ascii_hexdigit())
}
