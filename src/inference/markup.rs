//! Inline tool-call markup ("DSML") detection and decoding.
//!
//! Some DeepSeek responses carry the tool call in the text content instead
//! of the structured `tool_calls` channel:
//!
//! ```text
//! <｜DSML｜invoke name="search_course_content">
//! <｜DSML｜parameter name="query">what is tool calling</｜DSML｜parameter>
//! </｜DSML｜invoke>
//! ```
//!
//! The same tags also appear with an ASCII pipe and loose spacing, e.g.
//! `< | DSML | invoke name="...">` and `< / | DSML | parameter>`. Both forms
//! are accepted everywhere.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Returned in place of a reply that is nothing but undecodable markup.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I couldn't complete that request. Please try rephrasing your question.";

// ─── Grammar ─────────────────────────────────────────────────────────────────

/// `<`, optional `/`, separator, `DSML`, separator. Matches start and end tags.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<\s*/?\s*[|｜]\s*DSML\s*[|｜]").expect("marker pattern is valid")
});

static INVOKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<\s*[|｜]\s*DSML\s*[|｜]\s*invoke\s+name\s*=\s*"([^"]+)"[^>]*>"#)
        .expect("invoke pattern is valid")
});

static PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<\s*[|｜]\s*DSML\s*[|｜]\s*parameter\s+name\s*=\s*"([^"]+)"[^>]*>(.*?)<\s*/\s*[|｜]\s*DSML\s*[|｜]\s*parameter\s*>"#,
    )
    .expect("parameter pattern is valid")
});

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("integer pattern is valid"));

// ─── Types ───────────────────────────────────────────────────────────────────

/// One invocation decoded from inline markup.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupToolCall {
    pub name: String,
    pub arguments: Map<String, Value>,
}

// ─── Detection / Decoding ────────────────────────────────────────────────────

/// Whether `text` contains any inline tool-call tag.
pub fn detect(text: &str) -> bool {
    MARKER.is_match(text)
}

/// Decode the first invocation in `text`.
///
/// Returns `None` when no invoke tag with a `name` attribute is present.
/// Parameter values are trimmed; a value that is an optional `-` followed by
/// ASCII digits becomes an integer. Repeated keys keep the last value.
pub fn parse(text: &str) -> Option<MarkupToolCall> {
    let name = INVOKE.captures(text)?.get(1)?.as_str().trim().to_string();
    if name.is_empty() {
        return None;
    }

    let mut arguments = Map::new();
    for caps in PARAMETER.captures_iter(text) {
        let (Some(key), Some(raw)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        arguments.insert(key.as_str().to_string(), coerce_value(raw.as_str().trim()));
    }

    Some(MarkupToolCall { name, arguments })
}

fn coerce_value(value: &str) -> Value {
    if INTEGER.is_match(value) {
        // Out-of-range numbers stay text.
        if let Ok(n) = value.parse::<i64>() {
            return Value::from(n);
        }
    }
    Value::String(value.to_string())
}

// ─── Sanitizing ──────────────────────────────────────────────────────────────

/// The readable text before the first tag, or [`FALLBACK_REPLY`] if there is none.
pub fn readable_prefix(text: &str) -> String {
    let prefix = match MARKER.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    };
    let prefix = prefix.trim();
    if prefix.is_empty() {
        FALLBACK_REPLY.to_string()
    } else {
        prefix.to_string()
    }
}

/// Return `text` unchanged unless it carries markup, else its readable prefix.
pub fn sanitize(text: &str) -> String {
    if detect(text) {
        readable_prefix(text)
    } else {
        text.to_string()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FULLWIDTH: &str = concat!(
        "<｜DSML｜invoke name=\"search_course_content\">",
        "<｜DSML｜parameter name=\"query\">what is tool calling</｜DSML｜parameter>",
        "</｜DSML｜invoke>"
    );

    const ASCII: &str = concat!(
        "< | DSML | invoke name=\"search_course_content\">",
        "< | DSML | parameter name=\"query\">what is tool calling< / | DSML | parameter>",
        "< / | DSML | invoke>"
    );

    #[test]
    fn test_detect_both_variants() {
        assert!(detect(FULLWIDTH));
        assert!(detect(ASCII));
        assert!(detect("text then </｜DSML｜invoke>"));
    }

    #[test]
    fn test_detect_plain_text() {
        assert!(!detect("RAG combines retrieval with generation."));
        assert!(!detect("a | b < c"));
        assert!(!detect("<DSML>"));
    }

    #[test]
    fn test_variants_decode_identically() {
        let a = parse(FULLWIDTH).unwrap();
        let b = parse(ASCII).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.name, "search_course_content");
        assert_eq!(a.arguments["query"], "what is tool calling");
        assert_eq!(a.arguments.len(), 1);
    }

    #[test]
    fn test_integer_coercion() {
        let text = concat!(
            "<｜DSML｜invoke name=\"search_course_content\">",
            "<｜DSML｜parameter name=\"lesson_number\" string=\"false\">2</｜DSML｜parameter>",
            "<｜DSML｜parameter name=\"offset\">-3</｜DSML｜parameter>",
            "<｜DSML｜parameter name=\"course_name\">2a</｜DSML｜parameter>",
            "<｜DSML｜parameter name=\"dash\">-</｜DSML｜parameter>",
            "</｜DSML｜invoke>"
        );
        let call = parse(text).unwrap();
        assert_eq!(call.arguments["lesson_number"], Value::from(2));
        assert_eq!(call.arguments["offset"], Value::from(-3));
        assert_eq!(call.arguments["course_name"], Value::from("2a"));
        assert_eq!(call.arguments["dash"], Value::from("-"));
    }

    #[test]
    fn test_overflowing_integer_stays_text() {
        let text = concat!(
            "<｜DSML｜invoke name=\"t\">",
            "<｜DSML｜parameter name=\"n\">123456789012345678901234567890</｜DSML｜parameter>",
            "</｜DSML｜invoke>"
        );
        let call = parse(text).unwrap();
        assert_eq!(call.arguments["n"], Value::from("123456789012345678901234567890"));
    }

    #[test]
    fn test_values_are_trimmed_and_may_span_lines() {
        let text = "<｜DSML｜invoke name=\"search_course_content\">\n\
                    <｜DSML｜parameter name=\"query\">\n  vector\n  databases \n</｜DSML｜parameter>\n\
                    </｜DSML｜invoke>";
        let call = parse(text).unwrap();
        assert_eq!(call.arguments["query"], "vector\n  databases");
    }

    #[test]
    fn test_last_duplicate_key_wins() {
        let text = concat!(
            "<｜DSML｜invoke name=\"search_course_content\">",
            "<｜DSML｜parameter name=\"query\">first</｜DSML｜parameter>",
            "<｜DSML｜parameter name=\"query\">second</｜DSML｜parameter>",
            "</｜DSML｜invoke>"
        );
        assert_eq!(parse(text).unwrap().arguments["query"], "second");
    }

    #[test]
    fn test_invoke_without_parameters() {
        let call = parse("<｜DSML｜invoke name=\"get_course_outline\"></｜DSML｜invoke>").unwrap();
        assert_eq!(call.name, "get_course_outline");
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_parse_without_invoke_is_none() {
        assert!(parse("plain answer").is_none());
        assert!(parse("<｜DSML｜function_calls><｜DSML｜invoke>").is_none());
    }

    #[test]
    fn test_readable_prefix() {
        let text = format!("Let me look that up.\n\n{FULLWIDTH}");
        assert_eq!(readable_prefix(&text), "Let me look that up.");
        assert_eq!(readable_prefix(FULLWIDTH), FALLBACK_REPLY);
        assert_eq!(readable_prefix("   \n"), FALLBACK_REPLY);
    }

    #[test]
    fn test_sanitize_leaves_plain_text_untouched() {
        assert_eq!(sanitize("  spaced answer  "), "  spaced answer  ");
        assert_eq!(sanitize(ASCII), FALLBACK_REPLY);
        assert!(!detect(&sanitize(&format!("Intro {ASCII}"))));
    }
}
