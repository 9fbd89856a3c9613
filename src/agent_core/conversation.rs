//! ConversationState — the per-request message list fed to the model.
//!
//! Responsibilities:
//! - Seed the list as `[system, user]`
//! - Append assistant turns and their tool results in order
//! - Hand the model a `&[ChatMessage]` view each round
//!
//! The state lives for one answer and is never persisted here; session
//! history arrives pre-rendered inside the system message.

use crate::inference::types::{ChatMessage, Role, ToolCall};

// ─── ConversationState ──────────────────────────────────────────────────────

/// Append-only message list owned by a single `generate` call.
#[derive(Debug, Clone)]
pub struct ConversationState {
    messages: Vec<ChatMessage>,
}

impl ConversationState {
    /// Start a conversation with a system prompt and the user's query.
    pub fn new(system: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(query)],
        }
    }

    /// Record an assistant turn that requested structured tool calls.
    pub fn push_assistant_tool_calls(&mut self, content: Option<String>, calls: &[ToolCall]) {
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content,
            tool_call_id: None,
            tool_calls: Some(calls.iter().map(ToolCall::to_response).collect()),
        });
    }

    /// Record the outcome of the structured call with id `tool_call_id`.
    pub fn push_tool_result(&mut self, tool_call_id: &str, text: impl Into<String>) {
        self.messages.push(ChatMessage::tool(tool_call_id, text));
    }

    /// Record an assistant turn verbatim (the inline-markup path).
    pub fn push_assistant_text(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(text));
    }

    /// Record a user-role message, used to return inline-markup tool results.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::user(text));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether the list starts `[system, user]` and never holds two
    /// assistant turns back to back.
    pub fn is_well_formed(&self) -> bool {
        is_well_formed(&self.messages)
    }
}

/// Shape check over any message list sent to the model.
pub fn is_well_formed(messages: &[ChatMessage]) -> bool {
    let starts_right = matches!(
        messages,
        [first, second, ..] if first.role == Role::System && second.role == Role::User
    );
    starts_right
        && messages
            .windows(2)
            .all(|pair| !(pair[0].role == Role::Assistant && pair[1].role == Role::Assistant))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
