//! Creating the commit from a chosen message.
//!
//! Shells out to the system `git` so the user's hooks, signing config and
//! editor settings apply exactly as they would for a manual commit.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::CommitError;

/// Join subject and body with a blank line. A blank body is dropped.
pub fn full_message(message: &str, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        message.to_string()
    } else {
        format!("{message}\n\n{body}")
    }
}

/// Run `git commit -m <message>` in the current directory.
pub fn run_commit(message: &str, body: &str) -> Result<(), CommitError> {
    run_commit_in(Path::new("."), message, body)
}

/// Run `git commit` in `dir`, inheriting stdio so hook output stays visible.
pub fn run_commit_in(dir: &Path, message: &str, body: &str) -> Result<(), CommitError> {
    if which::which("git").is_err() {
        return Err(CommitError::GitNotFound);
    }

    let full = full_message(message, body);
    debug!("Running git commit in {}", dir.display());

    let status = Command::new("git")
        .arg("commit")
        .arg("-m")
        .arg(&full)
        .current_dir(dir)
        .status()
        .map_err(CommitError::Spawn)?;

    if !status.success() {
        return Err(CommitError::GitFailed {
            code: status.code(),
        });
    }

    Ok(())
}
