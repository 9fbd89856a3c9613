//! Shared types for the course tools.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ─── Citations ───────────────────────────────────────────────────────────────

/// A citation shown next to the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// `"<course>"` or `"<course> - Lesson <n>"`.
    pub label: String,
    pub url: Option<String>,
}

// ─── Index results ───────────────────────────────────────────────────────────

/// Where a chunk came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub course_title: String,
    #[serde(default)]
    pub lesson_number: Option<i64>,
}

/// Ranked hits from a semantic search, or the reason the search failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub documents: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
    #[serde(default)]
    pub distances: Vec<f32>,
    /// Set when the search itself failed, e.g. an unknown course name.
    #[serde(default)]
    pub error: Option<String>,
}

impl SearchResults {
    /// A failed search carrying `error`.
    pub fn empty(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents paired with their metadata.
    pub fn hits(&self) -> impl Iterator<Item = (&str, &ChunkMetadata)> {
        self.documents
            .iter()
            .map(String::as_str)
            .zip(self.metadata.iter())
    }
}

/// One lesson of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub lesson_number: i64,
    pub title: String,
    #[serde(default)]
    pub lesson_link: Option<String>,
}

/// Course metadata used for outline questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseOutline {
    pub title: String,
    #[serde(default)]
    pub course_link: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

// ─── CourseIndex ─────────────────────────────────────────────────────────────

/// The semantic index over course chunks and course metadata.
///
/// Course names passed in may be partial; the index resolves them to the
/// best-matching course title.
#[async_trait]
pub trait CourseIndex: Send + Sync {
    /// Search chunks, optionally restricted to one course and/or lesson.
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<i64>,
    ) -> SearchResults;

    async fn lesson_link(&self, course_title: &str, lesson_number: i64) -> Option<String>;

    async fn course_link(&self, course_title: &str) -> Option<String>;

    /// Outline of the course best matching `course_name`, if any.
    async fn course_outline(&self, course_name: &str) -> Option<CourseOutline>;
}

// ─── Tests ───────────────────────────────────────────────────────────────────
