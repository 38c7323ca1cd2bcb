//! Async LLM client for agent perspectives
//!
//! This is a model-agnostic HTTP client for calling LLM APIs.
//! Supports both Anthropic and OpenAI-compatible APIs.
//! One request per perspective; no retries, no streaming.

use crate::core::config::LlmConfig;
use crate::core::error::{Result, SchellingError};
use crate::llm::TextGenerator;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// Async LLM client for making API calls
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    api_key_env: String,
    api_url: String,
    max_tokens: u32,
    temperature: f32,
    api_format: ApiFormat,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: Option<String>, config: &LlmConfig) -> Self {
        let api_format = Self::detect_api_format(&config.api_url);
        Self {
            client: Client::new(),
            api_key,
            api_key_env: config.api_key_env.clone(),
            api_url: config.api_url.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            api_format,
        }
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }

    /// Create a client reading the key from `config.api_key_env`
    ///
    /// A missing key is not fatal: the client is still built, and each
    /// request fails with `MissingCredential` so the failure can be shown
    /// in place of a perspective.
    pub fn from_config(config: &LlmConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!(
                var = %config.api_key_env,
                "API key not set - agent perspectives will be unavailable"
            );
        }
        Self::new(api_key, config)
    }

    pub fn api_format(&self) -> &ApiFormat {
        &self.api_format
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn credential(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| SchellingError::MissingCredential(self.api_key_env.clone()))
    }

    async fn complete_anthropic(&self, model: &str, prompt: &str) -> Result<String> {
        let api_key = self.credential()?;
        let request = AnthropicRequest {
            model: model.into(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user".into(),
                content: prompt.into(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SchellingError::LlmError(e.to_string()))?;

        let body = read_body(response).await?;
        let completion: AnthropicResponse = serde_json::from_str(&body)?;
        completion.into_text()
    }

    async fn complete_openai(&self, model: &str, prompt: &str) -> Result<String> {
        let api_key = self.credential()?;
        let request = OpenAIRequest {
            model: model.into(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "system".into(),
                content: prompt.into(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SchellingError::LlmError(e.to_string()))?;

        let body = read_body(response).await?;
        let completion: OpenAIResponse = serde_json::from_str(&body)?;
        completion.into_text()
    }
}

/// Response body text, or an error carrying the status for non-2xx replies
async fn read_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SchellingError::LlmError(e.to_string()))?;
    if !status.is_success() {
        return Err(status_error(status, &body));
    }
    Ok(body)
}

fn status_error(status: StatusCode, body: &str) -> SchellingError {
    SchellingError::LlmError(format!("API error ({}): {}", status, body.trim()))
}

/// Trimmed completion text; a missing or blank completion is an error
fn completion_text(text: Option<String>) -> Result<String> {
    let text = text.unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Err(SchellingError::LlmError("Empty response".into()));
    }
    Ok(text.to_string())
}

impl TextGenerator for LlmClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        tracing::debug!(model, format = ?self.api_format, "Requesting completion");
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(model, prompt).await,
            ApiFormat::OpenAI => self.complete_openai(model, prompt).await,
        }
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

impl AnthropicResponse {
    fn into_text(self) -> Result<String> {
        completion_text(self.content.into_iter().next().map(|c| c.text))
    }
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenAIResponse {
    fn into_text(self) -> Result<String> {
        completion_text(self.choices.into_iter().next().map(|c| c.message.content))
    }
}

// Shared
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = LlmConfig {
            api_url: "https://api.example.com/v1/chat/completions".into(),
            ..Default::default()
        };
        let client = LlmClient::new(Some("test-key".into()), &config);
        assert_eq!(client.api_key.as_deref(), Some("test-key"));
        assert_eq!(client.api_url, "https://api.example.com/v1/chat/completions");
        assert_eq!(client.max_tokens, 60);
        assert_eq!(client.api_format, ApiFormat::OpenAI);
    }

    #[test]
    fn test_detects_anthropic_format() {
        let config = LlmConfig {
            api_url: "https://api.anthropic.com/v1/messages".into(),
            ..Default::default()
        };
        let client = LlmClient::new(None, &config);
        assert_eq!(client.api_format(), &ApiFormat::Anthropic);
    }

    #[test]
    fn test_from_config_missing_key() {
        let config = LlmConfig {
            api_key_env: "SCHELLING_VOICES_TEST_UNSET_KEY".into(),
            ..Default::default()
        };
        let client = LlmClient::from_config(&config);
        assert!(!client.has_credential());
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let client = LlmClient::new(None, &LlmConfig::default());
        let err = client.generate("gpt-3.5-turbo", "hello").await.unwrap_err();
        assert!(matches!(err, SchellingError::MissingCredential(ref var) if var == "OPENAI_API_KEY"));
    }

    #[test]
    fn test_openai_request_shape() {
        let request = OpenAIRequest {
            model: "gpt-3.5-turbo".into(),
            max_tokens: 60,
            temperature: 0.7,
            messages: vec![Message {
                role: "system".into(),
                content: "prompt".into(),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["max_tokens"], 60);
    }

    fn is_empty_response(result: Result<String>) -> bool {
        matches!(result, Err(SchellingError::LlmError(ref msg)) if msg == "Empty response")
    }

    #[test]
    fn test_openai_reply_is_trimmed() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  I like it here.\n"}}]}"#;
        let completion: OpenAIResponse = serde_json::from_str(body).unwrap();
        assert_eq!(completion.into_text().unwrap(), "I like it here.");
    }

    #[test]
    fn test_openai_empty_choices() {
        let completion: OpenAIResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(is_empty_response(completion.into_text()));
    }

    #[test]
    fn test_whitespace_completion_is_empty() {
        let body = r#"{"choices":[{"message":{"content":" \n\t "}}]}"#;
        let completion: OpenAIResponse = serde_json::from_str(body).unwrap();
        assert!(is_empty_response(completion.into_text()));
    }

    #[test]
    fn test_anthropic_reply_and_empty_content() {
        let body = r#"{"content":[{"type":"text","text":"Too crowded. "}]}"#;
        let completion: AnthropicResponse = serde_json::from_str(body).unwrap();
        assert_eq!(completion.into_text().unwrap(), "Too crowded.");

        let empty: AnthropicResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(is_empty_response(empty.into_text()));
    }

    #[test]
    fn test_malformed_body_is_serde_error() {
        let err: SchellingError = serde_json::from_str::<OpenAIResponse>("<html>oops</html>")
            .unwrap_err()
            .into();
        assert!(matches!(err, SchellingError::SerdeError(_)));

        let missing: SchellingError = serde_json::from_str::<OpenAIResponse>(r#"{"id":"x"}"#)
            .unwrap_err()
            .into();
        assert!(matches!(missing, SchellingError::SerdeError(_)));
    }

    #[test]
    fn test_status_error_carries_status_and_body() {
        let err = status_error(StatusCode::TOO_MANY_REQUESTS, "rate limited\n");
        match err {
            SchellingError::LlmError(msg) => {
                assert!(msg.contains("429"), "{}", msg);
                assert!(msg.ends_with("rate limited"), "{}", msg);
            }
            other => panic!("expected LlmError, got {:?}", other),
        }
    }
}
