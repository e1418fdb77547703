// file: src/llm/response.rs
// description: recovers a json object from raw model output wrapped in prose or fences
// reference: https://docs.rs/serde_json

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use serde_json::{Map, Value};
use tracing::debug;

/// Parses the whole string as a JSON object, falling back to the span from
/// the first `{` to the last `}`. Brace balance is not checked, so a stray
/// `}` in trailing prose can widen the span and fail the parse.
pub fn parse_json_object(raw: &str) -> Result<Map<String, Value>> {
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(raw) {
        return Ok(object);
    }

    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(PipelineError::Parse(format!(
            "no JSON object in model output: {}",
            Validator::truncate_text(raw.trim(), 80)
        )));
    };

    if end <= start {
        return Err(PipelineError::Parse(
            "closing brace precedes opening brace".to_string(),
        ));
    }

    debug!("Retrying parse on braced span {}..={}", start, end);

    match serde_json::from_str::<Value>(&raw[start..=end]) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(PipelineError::Parse("braced span is not an object".to_string())),
        Err(e) => Err(PipelineError::Parse(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_plain_object() {
        let raw = r#"{"topics": [{"topic": "Rust", "subtopics": ["Traits"]}]}"#;
        let parsed = parse_json_object(raw).unwrap();

        let expected: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(Value::Object(parsed), expected);
    }

    #[test]
    fn test_object_wrapped_in_prose_and_fences() {
        let raw = "Sure! Here is the JSON:\n```json\n{\"unit\": \"Graphs\", \"long\": []}\n```\nLet me know.";
        let parsed = parse_json_object(raw).unwrap();

        assert_eq!(Value::Object(parsed), json!({"unit": "Graphs", "long": []}));
    }

    #[test]
    fn test_nested_braces_inside_object() {
        let raw = "prefix {\"a\": {\"b\": {\"c\": 1}}} suffix";
        let parsed = parse_json_object(raw).unwrap();

        assert_eq!(parsed["a"]["b"]["c"], json!(1));
    }

    #[test]
    fn test_no_braces_is_parse_error() {
        let err = parse_json_object("I cannot help with that.").unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
    }

    #[test]
    fn test_reversed_braces_is_parse_error() {
        assert!(matches!(
            parse_json_object("} nothing here {"),
            Err(PipelineError::Parse(_))
        ));
    }

    #[test]
    fn test_malformed_span_is_parse_error() {
        assert!(matches!(
            parse_json_object("here {\"unit\": } done"),
            Err(PipelineError::Parse(_))
        ));
    }

    #[test]
    fn test_top_level_array_is_not_an_object() {
        assert!(parse_json_object("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_stray_closing_brace_in_trailing_prose_fails() {
        let raw = "{\"a\": 1} and then a stray } brace";
        assert!(parse_json_object(raw).is_err());
    }
}
