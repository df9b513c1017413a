// gitstage: CI repository staging tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git binary resolution.
//!
//! ```text
//! tools.git = "git"           --> which("git")
//! tools.git = "/opt/git/bin"  --> must be an executable file
//!        | not found
//!        v
//! <agent_home>/externals/git/{cmd/git.exe | bin/git}
//!        | not found
//!        v
//! ProcessError::ToolNotFound (before any git invocation)
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ProcessError, StageResult};

/// Path of the git bundled in a CI agent's externals folder.
#[must_use]
pub fn agent_externals_git(agent_home: &Path) -> PathBuf {
    let base = agent_home.join("externals").join("git");
    if cfg!(windows) {
        base.join("cmd").join("git.exe")
    } else {
        base.join("bin").join("git")
    }
}

/// A regular file the current user could execute.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Resolves the git executable.
///
/// `configured` is either a bare program name, looked up in `PATH`, or a
/// path, used as-is if it is an executable file.
///
/// # Errors
///
/// Returns [`ProcessError::ToolNotFound`] listing every searched location if
/// neither the configured tool nor the agent's bundled git exists.
pub fn locate_git(configured: &Path, agent_home: Option<&Path>) -> StageResult<PathBuf> {
    let mut searched = Vec::new();

    let is_bare_name = configured.components().count() == 1 && !configured.is_absolute();
    if is_bare_name {
        searched.push(format!("'{}' in PATH", configured.display()));
        if let Ok(path) = which::which(configured) {
            debug!(git = %path.display(), "found git in PATH");
            return Ok(path);
        }
    } else {
        searched.push(configured.display().to_string());
        if is_executable(configured) {
            debug!(git = %configured.display(), "using configured git");
            return Ok(configured.to_path_buf());
        }
    }

    if let Some(home) = agent_home {
        let candidate = agent_externals_git(home);
        searched.push(candidate.display().to_string());
        if is_executable(&candidate) {
            debug!(git = %candidate.display(), "using agent externals git");
            return Ok(candidate);
        }
    }

    Err(ProcessError::ToolNotFound {
        name: "git".to_string(),
        searched: searched.join(", "),
    }
    .into())
}
