//! Repository context collection for commit message generation.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use git2::Repository;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::RepoError;

use super::staged::{staged_diff, staged_paths};
use super::truncate::truncate_lines;

/// Maximum number of commit subjects collected from history.
pub const RECENT_COMMIT_LIMIT: usize = 10;

/// Maximum number of lines read from the project description file.
pub const PROJECT_CONTEXT_MAX_LINES: usize = 100;

/// Branch name used when HEAD cannot be resolved.
pub const UNKNOWN_BRANCH: &str = "unknown";

/// Candidate project description files, tried in order.
const PROJECT_FILE_CANDIDATES: [&str; 4] = ["README.md", "readme.md", "README.rst", "README"];

/// Snapshot of repository state used to prompt for commit messages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepoContext {
    pub branch_name: String,
    pub staged_diff: String,
    pub changed_files: Vec<String>,
    pub recent_commits: Vec<String>,
    pub project_context: String,
}

/// Collect a [`RepoContext`] for the repository containing `repo_path`.
///
/// Fails with [`RepoError::NotARepository`] when no repository is found and with
/// [`RepoError::NoStagedChanges`] when nothing is staged. Branch, diff, history
/// and project context fall back to defaults instead of failing.
pub fn collect(repo_path: &Path, max_diff_lines: i64) -> Result<RepoContext, RepoError> {
    let repo = Repository::discover(repo_path).map_err(RepoError::NotARepository)?;

    let branch_name = current_branch(&repo);

    let changed_files = staged_paths(&repo)?;
    if changed_files.is_empty() {
        return Err(RepoError::NoStagedChanges);
    }

    let diff = staged_diff(&repo, &changed_files);
    let staged_diff = truncate_lines(&diff, max_diff_lines);

    let recent_commits = recent_commit_subjects(&repo, RECENT_COMMIT_LIMIT);

    let root = repo.workdir().unwrap_or(repo_path);
    let project_context = read_project_context(root);

    debug!(
        "Collected context: branch={}, {} staged files, {} diff bytes, {} recent commits",
        branch_name,
        changed_files.len(),
        staged_diff.len(),
        recent_commits.len()
    );

    Ok(RepoContext {
        branch_name,
        staged_diff,
        changed_files,
        recent_commits,
        project_context,
    })
}

/// Short branch name, abbreviated commit id when detached, or `"unknown"`.
pub fn current_branch(repo: &Repository) -> String {
    let head = match repo.head() {
        Ok(head) => head,
        Err(e) => {
            debug!("Could not read HEAD: {e}");
            return UNKNOWN_BRANCH.to_string();
        }
    };

    if head.is_branch()
        && let Some(name) = head.shorthand()
    {
        return name.to_string();
    }

    match head.target() {
        Some(oid) => oid.to_string().chars().take(8).collect(),
        None => UNKNOWN_BRANCH.to_string(),
    }
}

/// Subject lines of up to `limit` commits reachable from HEAD, newest first.
pub fn recent_commit_subjects(repo: &Repository, limit: usize) -> Vec<String> {
    let mut revwalk = match repo.revwalk() {
        Ok(walk) => walk,
        Err(e) => {
            warn!("Failed to create revwalk: {e}");
            return Vec::new();
        }
    };

    if let Err(e) = revwalk.push_head() {
        debug!("No history to walk: {e}");
        return Vec::new();
    }

    let mut subjects = Vec::new();
    for oid in revwalk.take(limit) {
        let commit = match oid.and_then(|oid| repo.find_commit(oid)) {
            Ok(commit) => commit,
            Err(e) => {
                warn!("Stopping history walk early: {e}");
                break;
            }
        };

        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
        let subject = message.split('\n').next().unwrap_or_default().to_string();
        subjects.push(subject);
    }

    subjects
}

/// First lines of the first readable project description file under `root`.
pub fn read_project_context(root: &Path) -> String {
    for name in PROJECT_FILE_CANDIDATES {
        let path = root.join(name);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(_) => continue,
        };

        let mut context = String::new();
        for line in BufReader::new(file)
            .lines()
            .take(PROJECT_CONTEXT_MAX_LINES)
        {
            match line {
                Ok(line) => {
                    context.push_str(&line);
                    context.push('\n');
                }
                Err(e) => {
                    debug!("Stopped reading {}: {e}", path.display());
                    break;
                }
            }
        }
        return context;
    }

    String::new()
}
