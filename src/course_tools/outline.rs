//! `get_course_outline` — course title, link, instructor and lesson list.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::agent_core::errors::ToolError;
use crate::inference::types::ToolDefinition;

use super::args::required_string;
use super::types::{CourseIndex, CourseOutline, Source};
use super::{CourseTool, ToolOutput};

pub const OUTLINE_TOOL_NAME: &str = "get_course_outline";

pub struct CourseOutlineTool {
    index: Arc<dyn CourseIndex>,
}

impl CourseOutlineTool {
    pub fn new(index: Arc<dyn CourseIndex>) -> Self {
        Self { index }
    }
}

fn render_outline(outline: &CourseOutline) -> String {
    let mut lines = vec![format!("Course: {}", outline.title)];
    if let Some(link) = &outline.course_link {
        lines.push(format!("Course link: {link}"));
    }
    if let Some(instructor) = &outline.instructor {
        lines.push(format!("Instructor: {instructor}"));
    }

    if outline.lessons.is_empty() {
        lines.push("Lessons: none listed".to_string());
    } else {
        lines.push(format!("Lessons ({}):", outline.lessons.len()));
        let mut lessons: Vec<_> = outline.lessons.iter().collect();
        lessons.sort_by_key(|l| l.lesson_number);
        for lesson in lessons {
            lines.push(format!("- Lesson {}: {}", lesson.lesson_number, lesson.title));
        }
    }

    lines.join("\n")
}

#[async_trait]
impl CourseTool for CourseOutlineTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            OUTLINE_TOOL_NAME,
            "Get a course outline: title, course link, instructor, and the numbered list of lessons",
            json!({
                "type": "object",
                "properties": {
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    }
                },
                "required": ["course_name"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> Result<ToolOutput, ToolError> {
        let course_name = required_string(OUTLINE_TOOL_NAME, arguments, "course_name")?;

        let Some(outline) = self.index.course_outline(&course_name).await else {
            return Ok(ToolOutput::text_only(format!(
                "No course found matching '{course_name}'"
            )));
        };

        Ok(ToolOutput {
            text: render_outline(&outline),
            sources: vec![Source {
                label: outline.title.clone(),
                url: outline.course_link.clone(),
            }],
        })
    }
}
