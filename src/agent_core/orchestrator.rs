//! Answer loop — drives the model through at most two tool rounds.
//!
//! Each round the model's reply is classified as a [`ToolCallSignal`]:
//!
//! 1. **Structured** — `finish_reason == "tool_calls"` with at least one call.
//!    The assistant turn is echoed back and every call gets a `tool` message
//!    carrying its correlation id.
//! 2. **Markup** — the text carries inline `DSML` tags. Exactly one
//!    invocation is decoded; the raw text is echoed as the assistant turn and
//!    the result goes back as a `user` message.
//! 3. **None** — plain text, returned as the answer.
//!
//! While rounds remain the follow-up call re-advertises the tools. The call
//! made after the last permitted round omits them so the model has to answer.
//! Whatever leaves this module has had any markup stripped.

use crate::inference::client::ChatBackend;
use crate::inference::errors::InferenceError;
use crate::inference::markup;
use crate::inference::types::{ChatResponse, ToolCall, ToolDefinition};

use super::conversation::ConversationState;
use super::tool_router::{dispatch_single, dispatch_tool_calls, ToolExecutor};

// ─── Constants ──────────────────────────────────────────────────────────────

/// Maximum number of tool rounds per question.
///
/// A round is one model reply plus the executions it asked for.
pub const MAX_TOOL_ROUNDS: usize = 2;

/// Fixed instructions sent as the system message on every request.
pub const SYSTEM_PROMPT: &str = "\
You are an assistant for course materials and educational content. You can search the course catalog with tools.

Tool usage:
- Call `search_course_content` only for questions about specific course content or detailed course material
- Call `get_course_outline` for questions about a course's structure, lesson list, instructor, or link
- Use at most two tool calls per question, and only make a second one when the first result is not enough
- Build your answer from the tool results, stating facts as found
- If a search returns nothing relevant, say so plainly and do not suggest alternatives

Answering:
- General knowledge questions: answer from what you already know, without tools
- Course-specific questions: look the material up first, then answer
- For outline questions, give the course title, course link, and every lesson with its number and title
- Give the answer only. Do not describe your reasoning or your searches, and do not say \"based on the search results\"

Every answer should be brief and to the point, educational, written in clear language, and backed by an example when one helps.";

// ─── ToolCallSignal ─────────────────────────────────────────────────────────

/// What a model reply asks the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolCallSignal<'a> {
    /// Typed tool calls in the structured channel.
    Structured(&'a [ToolCall]),
    /// Text carrying inline tool-call markup.
    Markup(&'a str),
    /// A plain answer.
    None,
}

impl<'a> ToolCallSignal<'a> {
    /// Classify a reply, structured calls first.
    pub fn classify(response: &'a ChatResponse) -> Self {
        if response.finished_for_tools() && !response.tool_calls.is_empty() {
            return ToolCallSignal::Structured(&response.tool_calls);
        }
        match response.content.as_deref() {
            Some(text) if markup::detect(text) => ToolCallSignal::Markup(text),
            _ => ToolCallSignal::None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ToolCallSignal::Structured(_) => "structured",
            ToolCallSignal::Markup(_) => "markup",
            ToolCallSignal::None => "none",
        }
    }
}

/// System message text: the fixed prompt plus any rendered history.
pub fn build_system_prompt(history: Option<&str>) -> String {
    match history {
        Some(history) => format!("{SYSTEM_PROMPT}\n\nPrevious conversation:\n{history}"),
        None => SYSTEM_PROMPT.to_string(),
    }
}

// ─── ResponseGenerator ──────────────────────────────────────────────────────

/// Runs the tool-calling loop against a [`ChatBackend`].
///
/// Holds no per-request state, so one generator can serve many questions.
pub struct ResponseGenerator<B> {
    backend: B,
}

impl<B: ChatBackend> ResponseGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Answer `query`, executing tools through `executor` when the model asks.
    ///
    /// Tool failures and undecodable markup never surface as errors; only a
    /// failed model call does.
    pub async fn generate(
        &self,
        query: &str,
        history: Option<&str>,
        tools: Option<&[ToolDefinition]>,
        mut executor: Option<&mut dyn ToolExecutor>,
    ) -> Result<String, InferenceError> {
        let tools = tools.filter(|t| !t.is_empty());
        let mut state = ConversationState::new(build_system_prompt(history), query);

        let mut response = self.backend.chat_completion(state.messages(), tools).await?;
        let mut rounds = 0;

        while rounds < MAX_TOOL_ROUNDS {
            let signal = ToolCallSignal::classify(&response);

            tracing::info!(
                round = rounds,
                signal = signal.kind(),
                message_count = state.messages().len(),
                "=== AGENT LOOP ROUND START ==="
            );

            let Some(exec) = executor.as_deref_mut() else {
                return Ok(markup::sanitize(response.content_str()));
            };

            match signal {
                ToolCallSignal::Structured(calls) => {
                    state.push_assistant_tool_calls(response.content.clone(), calls);
                    for (call_id, outcome) in dispatch_tool_calls(exec, calls).await {
                        state.push_tool_result(&call_id, outcome.text);
                    }
                }
                ToolCallSignal::Markup(text) => {
                    let Some(call) = markup::parse(text) else {
                        tracing::warn!(
                            round = rounds,
                            "tool-call markup could not be decoded, returning readable prefix"
                        );
                        return Ok(markup::readable_prefix(text));
                    };
                    state.push_assistant_text(text);
                    let outcome = dispatch_single(exec, &call.name, &call.arguments).await;
                    state.push_user(outcome.text);
                }
                ToolCallSignal::None => {
                    return Ok(response.content.unwrap_or_default());
                }
            }

            rounds += 1;
            debug_assert!(state.is_well_formed());
            let follow_up_tools = if rounds < MAX_TOOL_ROUNDS { tools } else { None };
            response = self
                .backend
                .chat_completion(state.messages(), follow_up_tools)
                .await?;
        }

        tracing::info!(rounds, "tool round cap reached, returning final reply");
        Ok(markup::sanitize(response.content_str()))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
