//! In-memory `CourseIndex` for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::types::{CourseIndex, CourseOutline, Lesson, SearchResults};

/// `(query, course_name, lesson_number)` as passed to `search`.
pub type SearchCall = (String, Option<String>, Option<i64>);

/// Returns canned results and records every search.
#[derive(Default)]
pub struct StubIndex {
    results: SearchResults,
    lesson_link: Option<String>,
    course_link: Option<String>,
    outline: Option<CourseOutline>,
    searches: Mutex<Vec<SearchCall>>,
}

impl StubIndex {
    pub fn with_results(results: SearchResults) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    pub fn lesson_link(mut self, url: &str) -> Self {
        self.lesson_link = Some(url.to_string());
        self
    }

    pub fn course_link(mut self, url: &str) -> Self {
        self.course_link = Some(url.to_string());
        self
    }

    pub fn outline(mut self, outline: CourseOutline) -> Self {
        self.outline = Some(outline);
        self
    }

    pub fn searches(&self) -> Vec<SearchCall> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl CourseIndex for StubIndex {
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<i64>,
    ) -> SearchResults {
        self.searches.lock().unwrap().push((
            query.to_string(),
            course_name.map(String::from),
            lesson_number,
        ));
        self.results.clone()
    }

    async fn lesson_link(&self, _course_title: &str, _lesson_number: i64) -> Option<String> {
        self.lesson_link.clone()
    }

    async fn course_link(&self, _course_title: &str) -> Option<String> {
        self.course_link.clone()
    }

    async fn course_outline(&self, _course_name: &str) -> Option<CourseOutline> {
        self.outline.clone()
    }
}

/// Two-lesson course used across tests.
pub fn sample_outline() -> CourseOutline {
    CourseOutline {
        title: "Test RAG Course".into(),
        course_link: Some("https://example.com/rag".into()),
        instructor: Some("Test Instructor".into()),
        lessons: vec![
            Lesson {
                lesson_number: 2,
                title: "Vector Databases".into(),
                lesson_link: Some("https://example.com/rag/2".into()),
            },
            Lesson {
                lesson_number: 1,
                title: "Introduction to RAG".into(),
                lesson_link: Some("https://example.com/rag/1".into()),
            },
        ],
    }
}
