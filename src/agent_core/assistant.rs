//! CourseAssistant — one question in, one answer plus citations out.
//!
//! Wraps the answer loop with the course tool registry: clears citations,
//! asks the model with the course tools advertised, then hands back the
//! answer together with whatever sources the tools recorded.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::course_tools::{CourseIndex, Source, ToolManager};
use crate::inference::client::{ChatBackend, InferenceClient};
use crate::inference::config::{self, ModelsConfig};
use crate::inference::errors::InferenceError;

use super::orchestrator::ResponseGenerator;
use super::tool_router::ToolExecutor;

/// The answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnswer {
    pub answer: String,
    pub sources: Vec<Source>,
}

pub struct CourseAssistant<B> {
    generator: ResponseGenerator<B>,
    tools: ToolManager,
}

impl CourseAssistant<InferenceClient> {
    /// Assistant backed by the active model in `config`.
    pub fn from_config(
        config: &ModelsConfig,
        index: Arc<dyn CourseIndex>,
    ) -> Result<Self, InferenceError> {
        let client = InferenceClient::from_config(config)?;
        tracing::info!(model = %client.model_name(), "course assistant ready");
        Ok(Self::new(client, ToolManager::for_index(index)))
    }

    /// Assistant configured from `config/models.yaml` found at or above
    /// `start`, or the DeepSeek preset when there is no such file.
    pub fn from_project_dir(
        start: &Path,
        index: Arc<dyn CourseIndex>,
    ) -> Result<Self, InferenceError> {
        let config = config::load_or_default(start)?;
        Self::from_config(&config, index)
    }
}

impl<B: ChatBackend> CourseAssistant<B> {
    pub fn new(backend: B, tools: ToolManager) -> Self {
        Self {
            generator: ResponseGenerator::new(backend),
            tools,
        }
    }

    pub fn generator(&self) -> &ResponseGenerator<B> {
        &self.generator
    }

    /// Answer `query`. `history` is the caller's rendered prior exchange.
    ///
    /// Citations are scoped to this call; the list is cleared before and
    /// after so a failed question never leaks sources into the next one.
    pub async fn query(
        &mut self,
        query: &str,
        history: Option<&str>,
    ) -> Result<QueryAnswer, InferenceError> {
        self.tools.reset_sources();

        let prompt = format!("Answer this question about course materials: {query}");
        let definitions = self.tools.tool_definitions();

        let executor: &mut dyn ToolExecutor = &mut self.tools;
        let result = self
            .generator
            .generate(&prompt, history, Some(definitions.as_slice()), Some(executor))
            .await;

        let sources = self.tools.last_sources().to_vec();
        self.tools.reset_sources();

        let answer = result?;
        tracing::info!(
            answer_len = answer.len(),
            source_count = sources.len(),
            "query answered"
        );
        Ok(QueryAnswer { answer, sources })
    }
}
