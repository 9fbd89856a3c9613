//! Typed access to tool keyword arguments.

use serde_json::{Map, Value};

use crate::agent_core::errors::ToolError;

fn invalid(tool: &str, reason: String) -> ToolError {
    ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason,
    }
}

/// A non-empty string argument that must be present.
pub fn required_string(
    tool: &str,
    arguments: &Map<String, Value>,
    key: &str,
) -> Result<String, ToolError> {
    optional_string(tool, arguments, key)?
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| invalid(tool, format!("missing required argument '{key}'")))
}

/// A string argument; `null` counts as absent.
pub fn optional_string(
    tool: &str,
    arguments: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, ToolError> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        // Inline markup turns digit-only values into integers.
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(invalid(tool, format!("'{key}' must be a string, got {other}"))),
    }
}

/// An integer argument. Numeric strings are accepted.
pub fn optional_integer(
    tool: &str,
    arguments: &Map<String, Value>,
    key: &str,
) -> Result<Option<i64>, ToolError> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| invalid(tool, format!("'{key}' must be an integer, got {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| invalid(tool, format!("'{key}' must be an integer, got \"{s}\""))),
        Some(other) => Err(invalid(tool, format!("'{key}' must be an integer, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_string() {
        let a = args(json!({"query": "RAG", "blank": "  "}));
        assert_eq!(required_string("t", &a, "query").unwrap(), "RAG");
        assert!(required_string("t", &a, "blank").is_err());
        assert!(required_string("t", &a, "missing").is_err());
    }

    #[test]
    fn test_optional_string_accepts_numbers_and_null() {
        let a = args(json!({"course_name": 101, "none": null}));
        assert_eq!(optional_string("t", &a, "course_name").unwrap().as_deref(), Some("101"));
        assert_eq!(optional_string("t", &a, "none").unwrap(), None);
        assert!(optional_string("t", &args(json!({"k": [1]})), "k").is_err());
    }

    #[test]
    fn test_optional_integer() {
        let a = args(json!({"n": 2, "s": "3", "f": 1.5, "bad": "two"}));
        assert_eq!(optional_integer("t", &a, "n").unwrap(), Some(2));
        assert_eq!(optional_integer("t", &a, "s").unwrap(), Some(3));
        assert_eq!(optional_integer("t", &a, "missing").unwrap(), None);
        assert!(optional_integer("t", &a, "f").is_err());
        assert!(optional_integer("t", &a, "bad").is_err());
    }
}
