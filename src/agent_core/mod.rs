//! Agent Core — the question-answering layer.
//!
//! Submodules:
//! - `conversation`: per-request message list sent to the model
//! - `tool_router`: `ToolExecutor` trait and failure-isolating dispatch
//! - `orchestrator`: the bounded tool-calling loop (`ResponseGenerator`)
//! - `assistant`: `CourseAssistant`, question in, answer plus sources out
//! - `errors`: tool-level error types

pub mod assistant;
pub mod conversation;
pub mod errors;
pub mod orchestrator;
pub mod tool_router;

// Re-exports for convenience
pub use assistant::{CourseAssistant, QueryAnswer};
pub use conversation::ConversationState;
pub use errors::ToolError;
pub use orchestrator::{ResponseGenerator, ToolCallSignal, MAX_TOOL_ROUNDS, SYSTEM_PROMPT};
pub use tool_router::{ToolExecutor, ToolOutcome};
