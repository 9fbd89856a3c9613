//! Inference client: OpenAI-compatible chat completions against DeepSeek.
//!
//! This module handles all communication with the model endpoint:
//! - Non-streaming chat completions with tool advertisement
//! - Response decoding into [`ChatResponse`]
//! - Inline tool-call markup detection and decoding (`markup`)
//! - Model configuration loading from `config/models.yaml`
//!
//! The answer loop talks to the model through the [`ChatBackend`] trait, so
//! the endpoint is a config change and tests can script the model.

pub mod client;
pub mod config;
pub mod errors;
pub mod markup;
pub mod response;
pub mod types;

// Re-exports for convenience
pub use client::{ChatBackend, InferenceClient};
pub use config::{ModelConfig, ModelsConfig};
pub use errors::InferenceError;
pub use types::{ChatMessage, ChatResponse, Role, ToolCall, ToolDefinition};
