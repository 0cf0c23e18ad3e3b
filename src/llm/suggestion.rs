//! Ranked commit message suggestions and response parsing.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::AiError;

use super::json::extract_json;

/// A candidate commit message produced by a suggestion generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub rank: u32,
    pub confidence: String,
    pub message: String,
    /// Optional elaboration; empty means "no body".
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reasoning: String,
}

impl Suggestion {
    pub fn tier(&self) -> ConfidenceTier {
        ConfidenceTier::from_label(&self.confidence)
    }
}

/// Three-level confidence rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// Case-insensitive mapping; unknown labels are treated as low confidence.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => ConfidenceTier::High,
            "medium" => ConfidenceTier::Medium,
            _ => ConfidenceTier::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        }
    }
}

/// Full JSON object expected from the model.
#[derive(Debug, Clone, Deserialize)]
pub struct AiResponse {
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub detected_style: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse the model's text output into a non-empty suggestion list.
pub fn parse_suggestions(raw: &str) -> Result<Vec<Suggestion>, AiError> {
    let json_str = extract_json(raw);

    let response: AiResponse = serde_json::from_str(&json_str).map_err(|e| {
        debug!("Failed to parse AI response: {e}");
        AiError::InvalidJson {
            error: e.to_string(),
            raw: raw.trim().to_string(),
        }
    })?;

    if response.suggestions.is_empty() {
        return Err(AiError::NoSuggestions);
    }

    debug!(
        "Parsed {} suggestions (style={:?}, language={:?})",
        response.suggestions.len(),
        response.detected_style,
        response.language
    );

    Ok(response.suggestions)
}
