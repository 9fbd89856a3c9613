//! Shared types for the inference client.
//!
//! These mirror the OpenAI Chat Completions API types (which the DeepSeek
//! endpoint speaks), used for both request building and response parsing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─── Request Types ───────────────────────────────────────────────────────────

/// A single message in the conversation.
///
/// Serialization notes:
/// - `content` is sent as `""` (not `null`) for assistant messages that only
///   carry tool calls.
/// - `tool_call_id` and `tool_calls` are skipped when `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(serialize_with = "serialize_content")]
    pub content: Option<String>,
    /// Tool results are sent back as `tool` role messages correlated by id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Assistant messages may contain tool calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallResponse>>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// A `tool` role message answering the call with id `tool_call_id`.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_call_id: Some(tool_call_id.into()),
            tool_calls: None,
        }
    }

    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_call_id: None,
            tool_calls: None,
        }
    }
}

/// Custom serializer for `content`: emit `""` instead of `null` when `None`.
fn serialize_content<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(s) => serializer.serialize_str(s),
        None => serializer.serialize_str(""),
    }
}

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// Tool definition sent in the request.
///
/// Passed through to the model untouched; only `function.name` is ever read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub r#type: String,
    pub function: FunctionDefinition,
}

impl ToolDefinition {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            r#type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// Function definition within a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

// ─── Response Types ──────────────────────────────────────────────────────────

/// A structured tool call returned by the model.
///
/// Arguments are kept as the raw JSON text the model produced. Decoding
/// happens at dispatch time so one malformed call does not poison the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlation id echoed back in the `tool` role message.
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl ToolCall {
    /// Decode the argument text into a keyword mapping.
    ///
    /// Empty text is treated as an empty mapping.
    pub fn parsed_arguments(&self) -> Result<Map<String, Value>, String> {
        if self.arguments.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&self.arguments) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(format!("expected a JSON object, got {other}")),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Wire form used when echoing the assistant turn back to the model.
    pub fn to_response(&self) -> ToolCallResponse {
        ToolCallResponse {
            id: self.id.clone(),
            r#type: "function".to_string(),
            function: FunctionCallResponse {
                name: self.name.clone(),
                arguments: self.arguments.clone(),
            },
        }
    }
}

/// Tool call as carried in the OpenAI message format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResponse {
    pub id: String,
    pub r#type: String,
    pub function: FunctionCallResponse,
}

/// Function call details in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallResponse {
    pub name: String,
    pub arguments: String,
}

/// One decoded model turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    /// Text content, if the model produced any.
    pub content: Option<String>,
    /// Structured tool calls, in declaration order.
    pub tool_calls: Vec<ToolCall>,
    /// Why the model stopped: `"stop"`, `"tool_calls"`, `"length"`, ...
    pub finish_reason: Option<String>,
}

impl ChatResponse {
    /// A plain text turn that finished normally.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
            finish_reason: Some("stop".to_string()),
        }
    }

    /// A turn that ended in structured tool calls.
    pub fn with_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: None,
            tool_calls,
            finish_reason: Some("tool_calls".to_string()),
        }
    }

    /// Whether the model stopped to request tools.
    pub fn finished_for_tools(&self) -> bool {
        self.finish_reason.as_deref() == Some("tool_calls")
    }

    pub fn content_str(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
