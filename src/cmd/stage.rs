// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The `stage` command.
//!
//! ```text
//! Config --> StagingPlan + Credentials
//!        --> AuthContext (secrets registered)
//!        --> create destination
//!        --> locate git
//!        --> GitRunner --> RepositoryClient --> StagingPipeline::run
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use super::TaskResult;
use crate::auth::{AuthContext, SecretRegistry};
use crate::config::Config;
use crate::core::process::sink::TracingSink;
use crate::error::Result;
use crate::git::{GitRunner, RepositoryClient, locate_git};
use crate::stage::{StageReport, StagingPipeline};

/// Runs a full staging pass and reports its outcome.
pub async fn run_stage_command(config: &Config) -> TaskResult {
    match stage(config).await {
        Ok(report) => {
            info!(commit = %report.commit, "repository staged");
            TaskResult::Succeeded {
                commit: report.commit,
            }
        }
        Err(e) => {
            error!("staging failed: {e:#}");
            TaskResult::failed(&e)
        }
    }
}

/// Validates the configuration and drives the pipeline.
///
/// # Errors
///
/// Returns the first configuration, tool lookup, filesystem, or git error.
pub async fn stage(config: &Config) -> Result<StageReport> {
    let plan = config.staging_plan()?;
    let credentials = config.credentials()?;

    let registry = SecretRegistry::new();
    let auth = AuthContext::new(&credentials, &registry);

    let destination = plan.target().local_path().to_path_buf();
    std::fs::create_dir_all(&destination).with_context(|| {
        format!(
            "failed to create destination directory {}",
            destination.display()
        )
    })?;

    let git = locate_git(&config.tools.git, config.tools.agent_home.as_deref())?;
    info!(
        git = %git.display(),
        destination = %destination.display(),
        remote_url = %plan.target().remote_url(),
        "staging repository"
    );

    let runner = GitRunner::new(git, destination, Arc::new(TracingSink), &auth);
    let mut pipeline = StagingPipeline::new(RepositoryClient::new(runner), &auth, plan)?;
    let report = pipeline.run().await?;
    Ok(report)
}
