//! Agent Core error types.

use thiserror::Error;

/// Errors a tool executor can report for a single invocation.
///
/// These never abort the answer loop; the dispatcher turns them into
/// outcome text fed back to the model.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The named tool is not registered.
    #[error("Tool '{name}' not found")]
    UnknownTool { name: String },

    /// Arguments were missing or had the wrong type.
    #[error("invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// The tool ran and failed.
    #[error("{0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_displays_message_verbatim() {
        assert_eq!(ToolError::Failed("index offline".into()).to_string(), "index offline");
    }

    #[test]
    fn test_unknown_tool_names_the_tool() {
        let err = ToolError::UnknownTool {
            name: "delete_course".into(),
        };
        assert_eq!(err.to_string(), "Tool 'delete_course' not found");
    }
}
