//! Non-streaming chat-completion response parsing.
//!
//! Decodes the JSON body of `POST /chat/completions` into a [`ChatResponse`].
//! Tool call arguments are kept as raw text; the answer loop decodes them
//! per invocation.

use serde::Deserialize;
use uuid::Uuid;

use super::errors::InferenceError;
use super::types::{ChatResponse, ToolCall};

/// Parse a non-streaming chat completion response body.
pub fn parse_chat_response(body: &str) -> Result<ChatResponse, InferenceError> {
    #[derive(Deserialize)]
    struct CompletionResponse {
        choices: Vec<CompletionChoice>,
    }

    #[derive(Deserialize)]
    struct CompletionChoice {
        message: CompletionMessage,
        finish_reason: Option<String>,
    }

    #[derive(Deserialize)]
    struct CompletionMessage {
        content: Option<String>,
        /// DeepSeek reasoner output. Deserialized so it is tolerated, never used.
        #[allow(dead_code)]
        reasoning_content: Option<String>,
        tool_calls: Option<Vec<CompletionToolCall>>,
    }

    #[derive(Deserialize)]
    struct CompletionToolCall {
        id: Option<String>,
        function: CompletionFunction,
    }

    #[derive(Deserialize)]
    struct CompletionFunction {
        name: String,
        #[serde(default)]
        arguments: String,
    }

    let resp: CompletionResponse =
        serde_json::from_str(body).map_err(|e| InferenceError::ResponseParse {
            reason: format!("failed to parse chat completion: {e}"),
        })?;

    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or(InferenceError::ResponseParse {
            reason: "empty choices array".into(),
        })?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCall {
            id: tc.id.unwrap_or_else(|| format!("call_{}", Uuid::new_v4())),
            name: tc.function.name,
            arguments: tc.function.arguments,
        })
        .collect();

    Ok(ChatResponse {
        content: choice.message.content,
        tool_calls,
        finish_reason: choice.finish_reason,
    })
}
