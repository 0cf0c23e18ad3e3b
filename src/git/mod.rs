//! Git operations using git2-rs.

pub mod context;
pub mod staged;
pub mod truncate;

pub use context::{
    RepoContext, collect, current_branch, read_project_context, recent_commit_subjects,
};
pub use staged::{staged_diff, staged_paths, synthetic_diff};
pub use truncate::truncate_lines;
