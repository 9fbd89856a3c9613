//! OpenAI-compatible inference client.
//!
//! Sends non-streaming chat completion requests to the configured endpoint
//! (DeepSeek by default). No retries or fallback: a failed call is returned
//! to the caller as an [`InferenceError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;

use super::config::{ModelConfig, ModelsConfig};
use super::errors::InferenceError;
use super::response::parse_chat_response;
use super::types::{ChatCompletionRequest, ChatMessage, ChatResponse, ToolDefinition};

// ─── Constants ───────────────────────────────────────────────────────────────

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Total request timeout when the model config does not set one.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ─── ChatBackend ─────────────────────────────────────────────────────────────

/// Anything that can answer one chat-completion turn.
///
/// `tools` is `None` when the caller wants a plain answer; a `Some` list is
/// advertised with automatic tool selection.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatResponse, InferenceError>;
}

// ─── InferenceClient ─────────────────────────────────────────────────────────

/// HTTP client for the chat-completions endpoint.
pub struct InferenceClient {
    http: HttpClient,
    model_key: String,
    model: ModelConfig,
}

impl InferenceClient {
    /// Create a client for the active model in `config`.
    ///
    /// Does NOT check connectivity; that happens on the first request.
    pub fn from_config(config: &ModelsConfig) -> Result<Self, InferenceError> {
        let (key, model) = super::config::resolve_active_model(config)?;
        Self::new(key, model)
    }

    pub fn new(model_key: impl Into<String>, model: ModelConfig) -> Result<Self, InferenceError> {
        let timeout = model
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(REQUEST_TIMEOUT);

        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::ConnectionFailed {
                endpoint: model.base_url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            model_key: model_key.into(),
            model,
        })
    }

    /// The base URL of the model endpoint.
    pub fn base_url(&self) -> &str {
        &self.model.base_url
    }

    /// Human-readable model name.
    pub fn model_name(&self) -> &str {
        &self.model.display_name
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.model.base_url.trim_end_matches('/'))
    }

    /// Build the request body for one turn.
    ///
    /// Tools are only advertised (with `tool_choice: "auto"`) when the list
    /// is non-empty.
    fn build_request(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> ChatCompletionRequest {
        let tools = tools.filter(|t| !t.is_empty()).map(|t| t.to_vec());

        ChatCompletionRequest {
            model: self
                .model
                .model_name
                .clone()
                .unwrap_or_else(|| self.model_key.clone()),
            messages: messages.to_vec(),
            tool_choice: tools.as_ref().map(|_| "auto".to_string()),
            tools,
            temperature: self.model.temperature,
            max_tokens: self.model.max_tokens,
            stream: false,
        }
    }

    fn timeout_secs(&self) -> u64 {
        self.model
            .request_timeout_secs
            .unwrap_or(REQUEST_TIMEOUT.as_secs())
    }
}

#[async_trait]
impl ChatBackend for InferenceClient {
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatResponse, InferenceError> {
        let url = self.completions_url();
        let body = self.build_request(messages, tools);

        // Log the request metadata (not the full body)
        tracing::info!(
            url = %url,
            model = %body.model,
            message_count = body.messages.len(),
            has_tools = body.tools.is_some(),
            tool_count = body.tools.as_ref().map(|t| t.len()).unwrap_or(0),
            max_tokens = body.max_tokens,
            "=== LLM REQUEST ==="
        );

        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = self.model.api_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                InferenceError::Timeout {
                    duration_secs: self.timeout_secs(),
                }
            } else {
                InferenceError::ConnectionFailed {
                    endpoint: url.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "model endpoint returned an error");
            return Err(InferenceError::HttpError {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let body_text = response.text().await.map_err(|e| InferenceError::ResponseParse {
            reason: format!("failed to read response body: {e}"),
        })?;

        let parsed = parse_chat_response(&body_text)?;
        tracing::info!(
            finish_reason = ?parsed.finish_reason,
            tool_calls = parsed.tool_calls.len(),
            content_len = parsed.content_str().len(),
            "=== LLM RESPONSE ==="
        );
        Ok(parsed)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_model() -> ModelConfig {
        ModelConfig {
            display_name: "Test".to_string(),
            model_name: None,
            base_url: "http://localhost:11111/v1/".to_string(),
            api_key: None,
            temperature: 0.0,
            max_tokens: 800,
            request_timeout_secs: Some(12),
        }
    }

    fn search_tool() -> ToolDefinition {
        ToolDefinition::function(
            "search_course_content",
            "Search course materials",
            json!({"type": "object", "properties": {"query": {"type": "string"}}}),
        )
    }

    #[test]
    fn test_from_config_selects_active_model() {
        let client = InferenceClient::from_config(&ModelsConfig::default()).unwrap();
        assert_eq!(client.model_key, "deepseek-chat");
        assert_eq!(client.base_url(), "https://api.deepseek.com");
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let client = InferenceClient::new("test", test_model()).unwrap();
        assert_eq!(client.completions_url(), "http://localhost:11111/v1/chat/completions");
    }

    #[test]
    fn test_build_request_with_tools_sets_auto() {
        let client = InferenceClient::new("test", test_model()).unwrap();
        let tools = [search_tool()];
        let req = client.build_request(&[ChatMessage::user("hi")], Some(&tools));
        assert_eq!(req.model, "test", "model key is used when model_name is unset");
        assert_eq!(req.tool_choice.as_deref(), Some("auto"));
        assert_eq!(req.tools.as_ref().map(|t| t.len()), Some(1));
        assert!(!req.stream);
    }

    #[test]
    fn test_build_request_empty_tools_not_advertised() {
        let client = InferenceClient::new("test", test_model()).unwrap();
        let req = client.build_request(&[ChatMessage::user("hi")], Some(&[]));
        assert!(req.tools.is_none());
        assert!(req.tool_choice.is_none());

        let req = client.build_request(&[ChatMessage::user("hi")], None);
        assert!(req.tools.is_none());
    }

    #[test]
    fn test_timeout_secs_uses_model_override() {
        let client = InferenceClient::new("test", test_model()).unwrap();
        assert_eq!(client.timeout_secs(), 12);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connection_error() {
        let mut model = test_model();
        model.base_url = "http://127.0.0.1:9".to_string();
        let client = InferenceClient::new("test", model).unwrap();
        let err = client
            .chat_completion(&[ChatMessage::user("hi")], None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InferenceError::ConnectionFailed { .. } | InferenceError::Timeout { .. }
        ));
    }
}
