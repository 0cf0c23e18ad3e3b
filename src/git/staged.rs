//! Staged file enumeration and staged diff rendering using git2.

use git2::{DiffFormat, ErrorCode, Repository, Status, StatusOptions, Tree};
use tracing::{debug, warn};

use crate::error::RepoError;

/// Index-side status bits that mark a path as staged.
const STAGED_MASK: Status = Status::INDEX_NEW
    .union(Status::INDEX_MODIFIED)
    .union(Status::INDEX_DELETED)
    .union(Status::INDEX_RENAMED)
    .union(Status::INDEX_TYPECHANGE);

/// Header of the synthetic diff used when no line-level diff is available.
pub const SYNTHETIC_DIFF_HEADER: &str = "Initial commit: new files added:";

/// List repository-relative paths with staged changes, in status order.
///
/// Untracked files and working-tree-only edits are excluded. Rename detection
/// stays off, so a staged rename lists the deleted path and the added path.
pub fn staged_paths(repo: &Repository) -> Result<Vec<String>, RepoError> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(false).include_ignored(false);

    let statuses = repo.statuses(Some(&mut opts)).map_err(RepoError::Status)?;

    let paths = statuses
        .iter()
        .filter(|entry| entry.status().intersects(STAGED_MASK))
        .filter_map(|entry| entry.path().map(String::from))
        .collect();

    Ok(paths)
}

/// Resolve the HEAD tree, treating an unborn branch as "no HEAD".
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, git2::Error> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    head_ref.peel_to_tree().map(Some)
}

/// Produce the diff text for the staged changes.
///
/// With a HEAD commit the diff is HEAD tree vs. index. Without one, or when the
/// structured diff cannot be produced, the synthetic listing of `files` is used.
pub fn staged_diff(repo: &Repository, files: &[String]) -> String {
    let head_tree = match resolve_head_tree(repo) {
        Ok(Some(tree)) => tree,
        Ok(None) => {
            debug!("No HEAD commit, using synthetic diff");
            return synthetic_diff(files);
        }
        Err(e) => {
            warn!("Could not resolve HEAD tree, using synthetic diff: {e}");
            return synthetic_diff(files);
        }
    };

    match structured_diff(repo, &head_tree) {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => {
            debug!("Structured diff was empty, using synthetic diff");
            synthetic_diff(files)
        }
        Err(e) => {
            warn!("Failed to compute staged diff, using synthetic diff: {e}");
            synthetic_diff(files)
        }
    }
}

/// Render HEAD tree vs. index as patch text.
fn structured_diff(repo: &Repository, head_tree: &Tree<'_>) -> Result<String, git2::Error> {
    let diff = repo.diff_tree_to_index(Some(head_tree), None, None)?;

    let mut text = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        // Include the origin character for content lines
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    })?;

    Ok(text)
}

/// Build the path-only listing used when no structured diff is available.
pub fn synthetic_diff(files: &[String]) -> String {
    let mut text = String::from(SYNTHETIC_DIFF_HEADER);
    text.push('\n');
    for file in files {
        text.push_str("  + ");
        text.push_str(file);
        text.push('\n');
    }
    text
}
