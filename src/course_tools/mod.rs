//! Course tools — the tool host the assistant hands to the answer loop.
//!
//! Submodules:
//! - `types`: search results, outlines, citations, and the `CourseIndex` trait
//! - `search`: `search_course_content`
//! - `outline`: `get_course_outline`
//! - `manager`: `ToolManager`, registry plus per-question citation list
//!
//! Embedding, chunking and storage live behind `CourseIndex`.

mod args;
pub mod manager;
pub mod outline;
pub mod search;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::agent_core::errors::ToolError;
use crate::inference::types::ToolDefinition;

// Re-exports for convenience
pub use manager::ToolManager;
pub use outline::CourseOutlineTool;
pub use search::CourseSearchTool;
pub use types::{ChunkMetadata, CourseIndex, CourseOutline, Lesson, SearchResults, Source};

/// Text for the model plus any citations it produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutput {
    pub text: String,
    pub sources: Vec<Source>,
}

impl ToolOutput {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }
}

/// A tool the model can call.
#[async_trait]
pub trait CourseTool: Send + Sync {
    /// Schema advertised to the model.
    fn definition(&self) -> ToolDefinition;

    async fn execute(&self, arguments: &Map<String, Value>) -> Result<ToolOutput, ToolError>;
}
