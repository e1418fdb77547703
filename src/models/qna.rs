// file: src/models/qna.rs
// description: interview question/answer document and its text rendering
// reference: internal data structures

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    #[serde(alias = "q")]
    pub question: String,
    #[serde(alias = "a")]
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QnaDocument {
    pub unit: String,
    pub long: Vec<QaPair>,
    pub short: Vec<QaPair>,
}

impl QnaDocument {
    /// Builds a document from an untrusted model object. Missing or
    /// mistyped fields fall back to the unit name or empty values.
    pub fn from_model_object(object: &Map<String, Value>, unit_name: &str) -> Self {
        let unit = object
            .get("unit")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(unit_name)
            .to_string();

        Self {
            unit,
            long: pairs_from(object.get("long")),
            short: pairs_from(object.get("short")),
        }
    }

    pub fn question_count(&self) -> usize {
        self.long.len() + self.short.len()
    }

    pub fn to_text(&self) -> String {
        let mut lines = vec![
            format!("Unit: {}", self.unit),
            String::new(),
            "LONG-ANSWER:".to_string(),
        ];
        push_pairs(&mut lines, &self.long);
        lines.push("SHORT-ANSWER:".to_string());
        push_pairs(&mut lines, &self.short);

        format!("{}\n", lines.join("\n").trim())
    }
}

fn push_pairs(lines: &mut Vec<String>, pairs: &[QaPair]) {
    for (i, pair) in pairs.iter().enumerate() {
        lines.push(format!("{}. Q: {}", i + 1, pair.question));
        lines.push(format!(" A: {}", pair.answer));
        lines.push(String::new());
    }
}

fn pairs_from(value: Option<&Value>) -> Vec<QaPair> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| QaPair {
            question: string_field(item, &["q", "question"]),
            answer: string_field(item, &["a", "answer"]),
        })
        .collect()
}

fn string_field(item: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| item.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_backfills_missing_fields() {
        let doc = QnaDocument::from_model_object(&object(json!({})), "Sorting");

        assert_eq!(doc.unit, "Sorting");
        assert!(doc.long.is_empty());
        assert!(doc.short.is_empty());
    }

    #[test]
    fn test_accepts_both_key_styles_and_skips_junk() {
        let doc = QnaDocument::from_model_object(
            &object(json!({
                "unit": "Graphs",
                "long": [
                    {"q": "What is BFS?", "a": "Level order traversal."},
                    "not an object",
                    {"question": "What is DFS?"}
                ],
                "short": {"q": "wrong shape"}
            })),
            "fallback",
        );

        assert_eq!(doc.unit, "Graphs");
        assert_eq!(
            doc.long,
            vec![
                QaPair {
                    question: "What is BFS?".to_string(),
                    answer: "Level order traversal.".to_string(),
                },
                QaPair {
                    question: "What is DFS?".to_string(),
                    answer: String::new(),
                },
            ]
        );
        assert!(doc.short.is_empty());
        assert_eq!(doc.question_count(), 2);
    }

    #[test]
    fn test_text_rendering() {
        let doc = QnaDocument {
            unit: "Rust".to_string(),
            long: vec![QaPair {
                question: "Explain ownership.".to_string(),
                answer: "Each value has one owner.".to_string(),
            }],
            short: vec![QaPair {
                question: "Is Rust GC'd?".to_string(),
                answer: "No.".to_string(),
            }],
        };

        let expected = "Unit: Rust\n\nLONG-ANSWER:\n1. Q: Explain ownership.\n A: Each value has one owner.\n\nSHORT-ANSWER:\n1. Q: Is Rust GC'd?\n A: No.\n";
        assert_eq!(doc.to_text(), expected);
    }

    #[test]
    fn test_empty_document_text() {
        let doc = QnaDocument::from_model_object(&Map::new(), "Empty");
        assert_eq!(doc.to_text(), "Unit: Empty\n\nLONG-ANSWER:\nSHORT-ANSWER:\n");
    }
}
