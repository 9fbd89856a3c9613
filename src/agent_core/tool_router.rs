//! ToolRouter — dispatches model tool calls to the tool executor.
//!
//! The router is the bridge between the model's tool call decisions and the
//! caller-supplied [`ToolExecutor`]. It handles:
//! - Decoding structured call arguments
//! - Execution, one invocation at a time in declaration order
//! - Converting every failure into outcome text for the model
//!
//! Nothing here returns an error: each invocation yields exactly one
//! [`ToolOutcome`].

use std::time::Instant;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::inference::types::ToolCall;

use super::errors::ToolError;

// ─── Constants ──────────────────────────────────────────────────────────────

/// Prefix of the outcome text for a failed invocation.
pub const TOOL_ERROR_PREFIX: &str = "Tool execution error: ";

/// Max bytes of a tool result written to the log.
const LOG_PREVIEW_BYTES: usize = 200;

// ─── ToolExecutor ───────────────────────────────────────────────────────────

/// The capability the answer loop needs from its tool host.
///
/// Executing a tool may record citations or other bookkeeping on the
/// executor; the loop never looks at that state.
#[async_trait]
pub trait ToolExecutor: Send {
    async fn execute_tool(
        &mut self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<String, ToolError>;
}

// ─── ToolOutcome ────────────────────────────────────────────────────────────

/// Text fed back to the model for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub text: String,
    pub success: bool,
}

impl ToolOutcome {
    pub fn success(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }

    /// `"Tool execution error: <message>"`.
    pub fn failure(message: impl std::fmt::Display) -> Self {
        Self {
            text: format!("{TOOL_ERROR_PREFIX}{message}"),
            success: false,
        }
    }
}

// ─── Dispatch ───────────────────────────────────────────────────────────────

/// Dispatch a batch of structured tool calls.
///
/// Processes calls sequentially (model expects ordered results). Returns one
/// `(call id, outcome)` pair per call, in the same order.
pub async fn dispatch_tool_calls(
    executor: &mut dyn ToolExecutor,
    tool_calls: &[ToolCall],
) -> Vec<(String, ToolOutcome)> {
    let mut results = Vec::with_capacity(tool_calls.len());

    for tc in tool_calls {
        let outcome = match tc.parsed_arguments() {
            Ok(arguments) => dispatch_single(executor, &tc.name, &arguments).await,
            Err(reason) => {
                tracing::warn!(
                    tool = %tc.name,
                    call_id = %tc.id,
                    error = %reason,
                    "tool call arguments are not valid JSON"
                );
                ToolOutcome::failure(format!("invalid JSON arguments: {reason}"))
            }
        };
        results.push((tc.id.clone(), outcome));
    }

    let failed = count_failures(&results);
    tracing::info!(
        call_count = results.len(),
        failed,
        "=== TOOL BATCH DISPATCHED ==="
    );
    results
}

/// Execute one invocation, catching any failure.
pub async fn dispatch_single(
    executor: &mut dyn ToolExecutor,
    name: &str,
    arguments: &Map<String, Value>,
) -> ToolOutcome {
    let start = Instant::now();

    match executor.execute_tool(name, arguments).await {
        Ok(text) => {
            tracing::info!(
                tool = %name,
                elapsed_ms = start.elapsed().as_millis() as u64,
                result_len = text.len(),
                preview = %truncate_utf8(&text, LOG_PREVIEW_BYTES),
                "tool executed"
            );
            ToolOutcome::success(text)
        }
        Err(e) => {
            tracing::warn!(
                tool = %name,
                elapsed_ms = start.elapsed().as_millis() as u64,
                error = %e,
                "tool execution failed"
            );
            ToolOutcome::failure(e)
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Number of outcomes in a batch that carry an error.
fn count_failures(results: &[(String, ToolOutcome)]) -> usize {
    results.iter().filter(|(_, outcome)| !outcome.success).count()
}

/// Truncate `s` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ─── Tests ──────────────────────────────────────────────────────────────────
