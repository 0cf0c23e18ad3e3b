//! Error types for commitpick modules using thiserror.

use thiserror::Error;

use crate::llm::Provider;

/// Errors from reading repository state.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Not a git repository (or any parent directory): {0}")]
    NotARepository(#[source] git2::Error),

    #[error("No staged changes found. Run `git add` first.")]
    NoStagedChanges,

    #[error("Failed to read working tree status: {0}")]
    Status(#[source] git2::Error),
}

/// Errors from the suggestion providers.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("Empty response from {0} API")]
    EmptyResponse(Provider),

    #[error("Failed to parse AI response as JSON: {error}\n\nRaw response:\n{raw}")]
    InvalidJson { error: String, raw: String },

    #[error("AI returned no suggestions")]
    NoSuggestions,
}

impl AiError {
    /// Whether a retry has a reasonable chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            AiError::Http { source, .. } => source.is_timeout() || source.is_connect(),
            AiError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error(
        "API key not found.\n\n\
         Set it via environment variable:\n  \
         export ANTHROPIC_API_KEY=sk-ant-...\n  \
         export GEMINI_API_KEY=AIzaSy...\n\n\
         Or add it to ~/.config/commitpick/config.toml:\n  \
         api_key = \"sk-ant-...\"\n\n\
         Or run without a provider: commitpick --offline"
    )]
    MissingApiKey,
}

/// Errors from the interactive selector.
#[derive(Error, Debug)]
pub enum UiError {
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors from creating the commit.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("git executable not found in PATH")]
    GitNotFound,

    #[error("Failed to run git commit: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("git commit failed (exit code: {code:?})")]
    GitFailed { code: Option<i32> },
}
