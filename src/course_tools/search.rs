//! `search_course_content` — semantic search over lesson chunks.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::agent_core::errors::ToolError;
use crate::inference::types::ToolDefinition;

use super::args::{optional_integer, optional_string, required_string};
use super::types::{CourseIndex, SearchResults, Source};
use super::{CourseTool, ToolOutput};

pub const SEARCH_TOOL_NAME: &str = "search_course_content";

/// Searches course content with optional course and lesson filters.
pub struct CourseSearchTool {
    index: Arc<dyn CourseIndex>,
}

impl CourseSearchTool {
    pub fn new(index: Arc<dyn CourseIndex>) -> Self {
        Self { index }
    }

    /// Render hits as `[Course - Lesson N]` blocks and collect their sources.
    async fn format_results(&self, results: &SearchResults) -> ToolOutput {
        let mut blocks = Vec::with_capacity(results.documents.len());
        let mut sources = Vec::with_capacity(results.documents.len());

        for (doc, meta) in results.hits() {
            let label = match meta.lesson_number {
                Some(n) => format!("{} - Lesson {n}", meta.course_title),
                None => meta.course_title.clone(),
            };
            blocks.push(format!("[{label}]\n{doc}"));

            let lesson_url = match meta.lesson_number {
                Some(n) => self.index.lesson_link(&meta.course_title, n).await,
                None => None,
            };
            let url = match lesson_url {
                Some(url) => Some(url),
                None => self.index.course_link(&meta.course_title).await,
            };
            sources.push(Source { label, url });
        }

        ToolOutput {
            text: blocks.join("\n\n"),
            sources,
        }
    }
}

fn no_results_message(course_name: Option<&str>, lesson_number: Option<i64>) -> String {
    let course = course_name
        .map(|course| format!(" in course '{course}'"))
        .unwrap_or_default();
    let lesson = lesson_number
        .map(|n| format!(" in lesson {n}"))
        .unwrap_or_default();
    format!("No relevant content found{course}{lesson}.")
}

#[async_trait]
impl CourseTool for CourseSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            SEARCH_TOOL_NAME,
            "Search course materials with smart course name matching and lesson filtering",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for in the course content"
                    },
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    },
                    "lesson_number": {
                        "type": "integer",
                        "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> Result<ToolOutput, ToolError> {
        let query = required_string(SEARCH_TOOL_NAME, arguments, "query")?;
        let course_name = optional_string(SEARCH_TOOL_NAME, arguments, "course_name")?;
        let lesson_number = optional_integer(SEARCH_TOOL_NAME, arguments, "lesson_number")?;

        let results = self
            .index
            .search(&query, course_name.as_deref(), lesson_number)
            .await;

        if let Some(error) = &results.error {
            tracing::info!(error = %error, "course search reported an error");
            return Ok(ToolOutput::text_only(error.clone()));
        }

        if results.is_empty() {
            return Ok(ToolOutput::text_only(no_results_message(
                course_name.as_deref(),
                lesson_number,
            )));
        }

        Ok(self.format_results(&results).await)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
