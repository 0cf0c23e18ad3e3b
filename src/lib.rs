//! commitpick - suggests commit messages for staged changes and lets you pick one.
//!
//! # Overview
//!
//! commitpick reads the staged diff and surrounding repository context, asks a
//! language model (or a local heuristic) for three ranked commit messages, and
//! presents them in a small terminal selector where one can be accepted, edited
//! or rejected before `git commit` runs.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use error::{AiError, CommitError, ConfigError, RepoError, UiError};
pub use git::RepoContext;
pub use llm::{HttpGenerator, OfflineGenerator, Provider, Suggestion, SuggestionGenerator};
pub use ui::{Decision, SelectionSession};
