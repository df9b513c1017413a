// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The staging state machine.
//!
//! ```text
//! new()    proxy secrets registered, one-shot overrides built
//! run()
//!   version                                       (logged)
//!   Initialized        init, config gc.auto 0
//!   RemoteConfigured   remote add | set-url | keep, credential.helper check
//!   Fetched            [-c ..] fetch
//!   CheckedOut         [-c ..] checkout --force
//!   SubmodulesSynced   submodule sync, [-c ..] submodule update
//!   Complete           log -1 (only without an explicit commit)
//! ```
//!
//! Each stage runs inside an info-level `stage` span named after the state
//! it enters, so git output and command lines carry the stage they belong
//! to and the file log records how long each stage took.

use tracing::{Instrument, debug, info, info_span, warn};

use super::StageState;
use super::plan::{CredentialHelperPolicy, StagingPlan};
use crate::auth::AuthContext;
use crate::error::{GitError, StageError, StageResult};
use crate::git::{
    CheckoutOptions, CommandRunner, FetchOptions, OneShotOverrides, RepositoryClient,
    SubmoduleOptions,
};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    /// The explicit commit id, or the hash resolved after checkout.
    pub commit: String,
    /// First line of `git version`.
    pub git_version: String,
}

fn stage_span(state: StageState) -> tracing::Span {
    info_span!("stage", name = %state)
}

/// Drives a [`RepositoryClient`] through one staging run.
#[derive(Debug)]
pub struct StagingPipeline<R> {
    client: RepositoryClient<R>,
    plan: StagingPlan,
    overrides: OneShotOverrides,
    state: StageState,
}

impl<R: CommandRunner> StagingPipeline<R> {
    /// Prepares a run.
    ///
    /// Proxy credentials are registered for redaction here, before any
    /// git process is started.
    ///
    /// # Errors
    ///
    /// Fails if the proxy URL cannot carry the configured credentials.
    pub fn new(
        client: RepositoryClient<R>,
        auth: &AuthContext,
        plan: StagingPlan,
    ) -> StageResult<Self> {
        let proxy_url = match plan.proxy() {
            Some(proxy) => {
                let url = proxy.authenticated_url()?;
                for secret in proxy.secrets(&url) {
                    auth.registry().register(secret);
                }
                Some(url)
            }
            None => None,
        };
        let overrides =
            OneShotOverrides::for_auth(auth, proxy_url.as_ref().map(url::Url::as_str));

        Ok(Self {
            client,
            plan,
            overrides,
            state: StageState::Uninitialized,
        })
    }

    /// The last state entered.
    #[must_use]
    pub const fn state(&self) -> StageState {
        self.state
    }

    #[must_use]
    pub const fn client(&self) -> &RepositoryClient<R> {
        &self.client
    }

    #[must_use]
    pub const fn plan(&self) -> &StagingPlan {
        &self.plan
    }

    fn advance(&mut self, next: StageState) -> StageResult<()> {
        if !self.state.can_advance_to(next) {
            return Err(StageError::Other(
                format!("invalid stage transition {} -> {next}", self.state).into(),
            ));
        }
        self.state = next;
        info!(stage = %next, "stage complete");
        Ok(())
    }

    /// Runs every stage in order, stopping at the first failure.
    ///
    /// On failure [`state`](Self::state) is the last stage that completed.
    ///
    /// # Errors
    ///
    /// Returns the first stage's error; later stages do not run.
    pub async fn run(&mut self) -> StageResult<StageReport> {
        let git_version = self.client.version().await?;
        info!(version = %git_version, "using git");

        self.initialize()
            .instrument(stage_span(StageState::Initialized))
            .await?;
        self.configure_remote()
            .instrument(stage_span(StageState::RemoteConfigured))
            .await?;
        self.fetch()
            .instrument(stage_span(StageState::Fetched))
            .await?;
        self.checkout()
            .instrument(stage_span(StageState::CheckedOut))
            .await?;
        if self.plan.submodules().is_enabled() {
            self.update_submodules()
                .instrument(stage_span(StageState::SubmodulesSynced))
                .await?;
        }
        let commit = self
            .resolve_commit()
            .instrument(stage_span(StageState::Complete))
            .await?;

        Ok(StageReport {
            commit,
            git_version,
        })
    }

    async fn initialize(&mut self) -> StageResult<()> {
        info!(
            path = %self.plan.target().local_path().display(),
            "initializing repository"
        );
        self.client.init().await?;
        self.client.add_config("gc.auto", "0").await?;
        self.advance(StageState::Initialized)
    }

    async fn configure_remote(&mut self) -> StageResult<()> {
        if let Some(proxy) = self.plan.proxy() {
            info!(proxy = %proxy.url(), "using proxy for network operations");
        }

        let name = self.plan.remote();
        let url = self.plan.target().remote_url();
        let existing = self.client.get_config(&format!("remote.{name}.url")).await?;
        match existing {
            None => self.client.add_remote(name, &url).await?,
            Some(current) if current == url => {
                debug!(remote = name, "remote already configured");
            }
            Some(_) => {
                info!(remote = name, url = %url, "repointing existing remote");
                self.client.set_remote_url(name, &url).await?;
            }
        }

        self.check_credential_helper().await?;
        self.advance(StageState::RemoteConfigured)
    }

    async fn check_credential_helper(&self) -> StageResult<()> {
        let Some(helper) = self.client.get_config("credential.helper").await? else {
            return Ok(());
        };
        match self.plan.credential_helper() {
            CredentialHelperPolicy::Warn => {
                warn!(
                    helper = %helper,
                    "a credential helper is configured; an interactive prompt would block this run"
                );
                Ok(())
            }
            CredentialHelperPolicy::Fail => Err(GitError::BlockedPromptRisk { helper }.into()),
        }
    }

    async fn fetch(&mut self) -> StageResult<()> {
        let options = FetchOptions::default().with_depth(self.plan.fetch_depth());
        self.client
            .fetch(&self.overrides, &options, self.plan.remote())
            .await?;
        self.advance(StageState::Fetched)
    }

    async fn checkout(&mut self) -> StageResult<()> {
        let options = CheckoutOptions::new(self.plan.checkout().as_str());
        info!(git_ref = %options.target(), "checking out");
        self.client.checkout(&self.overrides, &options).await?;
        self.advance(StageState::CheckedOut)
    }

    async fn update_submodules(&mut self) -> StageResult<()> {
        let options = SubmoduleOptions::new(self.plan.submodules(), self.plan.fetch_depth());
        self.client.submodule_sync(&options).await?;
        self.client
            .submodule_update(&self.overrides, &options)
            .await?;
        self.advance(StageState::SubmodulesSynced)
    }

    async fn resolve_commit(&mut self) -> StageResult<String> {
        let commit = match self.plan.checkout().commit() {
            Some(commit) => commit.to_string(),
            None => self.client.latest_commit().await?,
        };
        self.advance(StageState::Complete)?;
        info!(commit = %commit, "staged");
        Ok(commit)
    }
}
