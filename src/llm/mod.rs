//! Suggestion generation: provider clients, prompts and response parsing.

pub mod client;
pub mod json;
pub mod offline;
pub mod prompt;
pub mod retry;
pub mod suggestion;

pub use client::{HttpGenerator, Provider, SuggestionGenerator};
pub use json::extract_json;
pub use offline::OfflineGenerator;
pub use prompt::{build_user_prompt, system_prompt};
pub use suggestion::{AiResponse, ConfidenceTier, Suggestion, parse_suggestions};
