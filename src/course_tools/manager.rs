//! ToolManager — the tool registry handed to the answer loop.
//!
//! Routes invocations by name and keeps the citation list for the current
//! question. The loop only sees it as a [`ToolExecutor`]; callers read
//! [`ToolManager::last_sources`] afterwards and clear it between questions.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::agent_core::errors::ToolError;
use crate::agent_core::tool_router::ToolExecutor;
use crate::inference::types::ToolDefinition;

use super::outline::CourseOutlineTool;
use super::search::CourseSearchTool;
use super::types::{CourseIndex, Source};
use super::CourseTool;

#[derive(Default)]
pub struct ToolManager {
    tools: Vec<Box<dyn CourseTool>>,
    sources: Vec<Source>,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the search and outline tools over `index`.
    pub fn for_index(index: Arc<dyn CourseIndex>) -> Self {
        let mut manager = Self::new();
        manager.register(Box::new(CourseSearchTool::new(index.clone())));
        manager.register(Box::new(CourseOutlineTool::new(index)));
        manager
    }

    /// Add a tool. A tool with the same name replaces the earlier one.
    pub fn register(&mut self, tool: Box<dyn CourseTool>) {
        let name = tool.definition().function.name;
        self.tools.retain(|t| t.definition().function.name != name);
        tracing::debug!(tool = %name, "registered tool");
        self.tools.push(tool);
    }

    /// Definitions to advertise to the model, in registration order.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Citations collected since the last reset, in execution order.
    pub fn last_sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn reset_sources(&mut self) {
        self.sources.clear();
    }

    fn find(&self, name: &str) -> Option<&dyn CourseTool> {
        self.tools
            .iter()
            .find(|t| t.definition().function.name == name)
            .map(|t| t.as_ref())
    }
}

#[async_trait]
impl ToolExecutor for ToolManager {
    async fn execute_tool(
        &mut self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<String, ToolError> {
        let tool = self.find(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
        })?;

        let output = tool.execute(arguments).await?;
        for source in output.sources {
            if !self.sources.contains(&source) {
                self.sources.push(source);
            }
        }
        Ok(output.text)
    }
}
