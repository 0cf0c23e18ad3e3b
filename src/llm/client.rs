//! Suggestion generation over HTTP (Anthropic Messages API and Gemini).

use std::env;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AiError;
use crate::git::RepoContext;

use super::prompt::{build_user_prompt, system_prompt};
use super::retry::retry_with_backoff;
use super::suggestion::{Suggestion, parse_suggestions};

const ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";
const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";
const GEMINI_KEY_PREFIX: &str = "AIzaSy";
const MAX_TOKENS: u32 = 1024;

/// Default request timeout (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable to override the default timeout.
const TIMEOUT_ENV_VAR: &str = "COMMITPICK_TIMEOUT";

/// Something that turns repository context into ranked suggestions.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    /// Returns a non-empty list ordered by rank.
    async fn generate(&self, ctx: &RepoContext, style: &str)
    -> Result<Vec<Suggestion>, AiError>;
}

/// Supported suggestion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    Gemini,
}

impl Provider {
    /// Pick the provider from the shape of the API key.
    pub fn detect(api_key: &str) -> Self {
        if api_key.starts_with(GEMINI_KEY_PREFIX) {
            Provider::Gemini
        } else {
            Provider::Anthropic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Anthropic => "Claude",
            Provider::Gemini => "Gemini",
        }
    }

    fn default_endpoint(&self) -> &'static str {
        match self {
            Provider::Anthropic => ANTHROPIC_ENDPOINT,
            Provider::Gemini => GEMINI_ENDPOINT,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gemini only understands its own model names; anything else maps to the default.
pub fn resolve_gemini_model(model: &str) -> String {
    if model.starts_with("gemini-") {
        model.to_string()
    } else {
        GEMINI_DEFAULT_MODEL.to_string()
    }
}

/// Get the configured request timeout.
///
/// Reads from COMMITPICK_TIMEOUT if set, otherwise uses the default.
/// Logs a warning if the variable holds an invalid value.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    choices: Vec<GeminiChoice>,
    #[serde(default)]
    error: Option<GeminiErrorBody>,
}

#[derive(Deserialize)]
struct GeminiChoice {
    message: GeminiMessage,
}

#[derive(Deserialize)]
struct GeminiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Generator backed by a hosted model.
pub struct HttpGenerator {
    client: Client,
    provider: Provider,
    endpoint: String,
    api_key: String,
    model: String,
    language: String,
    custom_format: String,
}

impl HttpGenerator {
    /// Create a generator, choosing the provider from the API key.
    pub fn new(
        api_key: &str,
        model: &str,
        language: &str,
        custom_format: &str,
    ) -> Result<Self, AiError> {
        let provider = Provider::detect(api_key);
        let model = match provider {
            Provider::Gemini => resolve_gemini_model(model),
            Provider::Anthropic => model.to_string(),
        };

        let client = Client::builder()
            .timeout(get_timeout())
            .build()
            .map_err(|source| AiError::Http { provider, source })?;

        Ok(Self {
            client,
            provider,
            endpoint: provider.default_endpoint().to_string(),
            api_key: api_key.to_string(),
            model,
            language: language.to_string(),
            custom_format: custom_format.to_string(),
        })
    }

    /// Send requests to `endpoint` instead of the provider's public URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run the prompt against the provider and return the raw text reply.
    pub async fn complete(&self, user_prompt: &str) -> Result<String, AiError> {
        retry_with_backoff(|| self.complete_once(user_prompt), AiError::is_transient).await
    }

    async fn complete_once(&self, user_prompt: &str) -> Result<String, AiError> {
        match self.provider {
            Provider::Anthropic => self.call_anthropic(user_prompt).await,
            Provider::Gemini => self.call_gemini(user_prompt).await,
        }
    }

    async fn call_anthropic(&self, user_prompt: &str) -> Result<String, AiError> {
        let provider = self.provider;
        let request = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: system_prompt(),
            messages: vec![ChatMessage {
                role: "user",
                content: user_prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|source| AiError::Http { provider, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| AiError::Http { provider, source })?;

        if !status.is_success() {
            return Err(AiError::Api {
                provider,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: AnthropicResponse =
            serde_json::from_str(&body).map_err(|e| AiError::InvalidJson {
                error: e.to_string(),
                raw: body.clone(),
            })?;

        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(AiError::EmptyResponse(provider))
    }

    async fn call_gemini(&self, user_prompt: &str) -> Result<String, AiError> {
        let provider = self.provider;
        let request = GeminiRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| AiError::Http { provider, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| AiError::Http { provider, source })?;

        if !status.is_success() {
            return Err(AiError::Api {
                provider,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| AiError::InvalidJson {
                error: e.to_string(),
                raw: body.clone(),
            })?;

        if let Some(error) = parsed.error {
            return Err(AiError::Api {
                provider,
                status: status.as_u16(),
                body: error.message,
            });
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(AiError::EmptyResponse(provider))
    }
}

#[async_trait]
impl SuggestionGenerator for HttpGenerator {
    async fn generate(
        &self,
        ctx: &RepoContext,
        style: &str,
    ) -> Result<Vec<Suggestion>, AiError> {
        let prompt = build_user_prompt(ctx, style, &self.custom_format, &self.language);
        debug!(
            "Requesting suggestions from {} ({}), prompt length: {} chars",
            self.provider,
            self.model,
            prompt.len()
        );

        let text = self.complete(&prompt).await?;
        parse_suggestions(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_provider_anthropic() {
        assert_eq!(Provider::detect("sk-ant-api03-abc"), Provider::Anthropic);
        assert_eq!(Provider::detect(""), Provider::Anthropic);
    }

    #[test]
    fn test_detect_provider_gemini() {
        assert_eq!(Provider::detect("AIzaSyD-example"), Provider::Gemini);
    }

    #[test]
    fn test_resolve_gemini_model() {
        assert_eq!(resolve_gemini_model("gemini-1.5-pro"), "gemini-1.5-pro");
        assert_eq!(resolve_gemini_model("claude-sonnet-4-6"), GEMINI_DEFAULT_MODEL);
    }

    #[test]
    fn test_new_resolves_model_for_gemini() {
        let generator = HttpGenerator::new("AIzaSy-test", "claude-sonnet-4-6", "en", "").unwrap();
        assert_eq!(generator.provider(), Provider::Gemini);
        assert_eq!(generator.model(), GEMINI_DEFAULT_MODEL);
    }

    #[test]
    fn test_new_keeps_model_for_anthropic() {
        let generator = HttpGenerator::new("sk-ant-test", "claude-opus-4-6", "en", "").unwrap();
        assert_eq!(generator.provider(), Provider::Anthropic);
        assert_eq!(generator.model(), "claude-opus-4-6");
    }

    #[test]
    fn test_get_timeout_default() {
        temp_env::with_var_unset(TIMEOUT_ENV_VAR, || {
            assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_get_timeout_from_env() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("15"), || {
            assert_eq!(get_timeout(), Duration::from_secs(15));
        });
    }

    #[test]
    fn test_get_timeout_invalid_env_uses_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("soon"), || {
            assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_api_error_transience() {
        let rate_limited = AiError::Api {
            provider: Provider::Anthropic,
            status: 429,
            body: String::new(),
        };
        let unavailable = AiError::Api {
            provider: Provider::Gemini,
            status: 503,
            body: String::new(),
        };
        let unauthorized = AiError::Api {
            provider: Provider::Anthropic,
            status: 401,
            body: String::new(),
        };
        assert!(rate_limited.is_transient());
        assert!(unavailable.is_transient());
        assert!(!unauthorized.is_transient());
        assert!(!AiError::NoSuggestions.is_transient());
    }
}
