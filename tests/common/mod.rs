//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use commitpick::Suggestion;
use git2::{Oid, Repository, Signature};

/// A throwaway git repository for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open repo config");
        config.set_str("user.name", "Test User").expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");
        config
            .set_bool("commit.gpgsign", false)
            .expect("Failed to disable signing");

        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write a file relative to the repository root, creating parent directories.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Add paths to the index.
    pub fn stage(&self, paths: &[&str]) {
        let mut index = self.repo.index().expect("Failed to get index");
        for rel in paths {
            index.add_path(Path::new(rel)).expect("Failed to add file");
        }
        index.write().expect("Failed to write index");
    }

    /// Write and stage a file in one step.
    pub fn stage_file(&self, rel: &str, content: &str) {
        self.write_file(rel, content);
        self.stage(&[rel]);
    }

    /// Commit whatever is currently in the index. Returns the commit OID.
    pub fn commit_index(&self, message: &str) -> Oid {
        let sig = self.signature();

        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        // Get parent commit if exists
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a commit touching `test.txt` with the given message.
    pub fn commit(&self, message: &str) -> Oid {
        let content = format!(
            "{}\n{}",
            message,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );
        self.stage_file("test.txt", &content);
        self.commit_index(message)
    }

    /// Create a branch at HEAD and check it out.
    pub fn checkout_new_branch(&self, name: &str) {
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("Failed to resolve HEAD");
        self.repo.branch(name, &head, false).expect("Failed to create branch");
        self.repo
            .set_head(&format!("refs/heads/{name}"))
            .expect("Failed to set HEAD");
    }

    /// Delete a file from disk and from the index.
    pub fn remove_file(&self, rel: &str) {
        std::fs::remove_file(self.dir.path().join(rel)).expect("Failed to remove file");
        let mut index = self.repo.index().expect("Failed to get index");
        index.remove_path(Path::new(rel)).expect("Failed to remove from index");
        index.write().expect("Failed to write index");
    }

    /// Point HEAD directly at a commit.
    pub fn detach_head(&self, oid: Oid) {
        self.repo.set_head_detached(oid).expect("Failed to detach HEAD");
    }

    /// Full message of the HEAD commit.
    pub fn head_message(&self) -> String {
        self.repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map(|c| c.message().unwrap_or_default().to_string())
            .expect("Failed to read HEAD commit")
    }
}

/// Build a suggestion for session and selector tests.
pub fn suggestion(rank: u32, confidence: &str, message: &str, body: &str) -> Suggestion {
    Suggestion {
        rank,
        confidence: confidence.to_string(),
        message: message.to_string(),
        body: body.to_string(),
        reasoning: format!("reason {rank}"),
    }
}
