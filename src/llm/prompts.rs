// file: src/llm/prompts.rs
// description: instruction text for topic-tree extraction and q&a generation
// reference: prompt formatting over utils::template

use crate::utils::PromptTemplate;

pub const TOPIC_SYSTEM_PROMPT: &str = "You structure topics.";
pub const QNA_SYSTEM_PROMPT: &str = "You generate interview QnA.";

pub const TOPIC_TREE_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"You are an expert interview coach. Given the following resume/profile text,
produce a comprehensive, well-structured topic tree that captures all
possible interview-relevant areas. Return JSON with this exact schema:

{
  "topics": [
    {
      "topic": "<Area, e.g., Machine Learning>",
      "subtopics": ["<Sub1>", "<Sub2>", ...]
    },
    ...
  ]
}

Rules:
- Include both general and resume-specific topics.
- Keep subtopic names short and file-system safe (avoid slashes/quotes).
- If the resume is sparse, infer reasonable topics.
- Limit to at most 12 topics, each with up to 10 subtopics."#,
);

pub const QNA_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"You are creating interview questions and concise reference answers for the unit: {unit_name}.
Use the provided resume/profile context to stay personalized.

Requirements:
- Generate {n_long} LONG-answer questions with answers ~5-6 lines each.
- Generate {n_short} SHORT-answer questions with answers ~1-3 lines each.
- Mix conceptual, practical, scenario-based, and resume-grounded items.
- Be specific; avoid fluff.

Return JSON with this schema:
{
    "unit": "{unit_name}",
    "long": [
        {"q": "...", "a": "..."},
        ...
    ],
    "short": [
        {"q": "...", "a": "..."},
        ...
    ]
}"#,
);

/// User prompt for one chunk; `index` is zero-based.
pub fn topic_chunk_prompt(chunk: &str, index: usize, total: usize) -> String {
    format!(
        "{}\n\nResume chunk (part {}/{}):\n{}",
        TOPIC_TREE_PROMPT.text(),
        index + 1,
        total,
        chunk
    )
}

pub fn qna_prompt(
    resume_text: &str,
    unit_name: &str,
    long_questions: usize,
    short_questions: usize,
) -> String {
    let instructions = QNA_PROMPT.render(&[
        ("unit_name", unit_name),
        ("n_long", &long_questions.to_string()),
        ("n_short", &short_questions.to_string()),
    ]);

    format!(
        "{}\n\nResume/Profile Context:\n{}\n\nTask: Create questions for: {}",
        instructions, resume_text, unit_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_chunk_prompt_numbers_parts_from_one() {
        let prompt = topic_chunk_prompt("Rust, Kafka", 0, 3);

        assert!(prompt.starts_with("You are an expert interview coach."));
        assert!(prompt.ends_with("Resume chunk (part 1/3):\nRust, Kafka"));
    }

    #[test]
    fn test_qna_prompt_substitutes_every_placeholder() {
        let prompt = qna_prompt("Built a compiler.", "Parsing", 4, 6);

        assert!(prompt.contains("for the unit: Parsing."));
        assert!(prompt.contains("Generate 4 LONG-answer"));
        assert!(prompt.contains("Generate 6 SHORT-answer"));
        assert!(prompt.contains("\"unit\": \"Parsing\""));
        assert!(prompt.contains("Resume/Profile Context:\nBuilt a compiler."));
        assert!(prompt.ends_with("Task: Create questions for: Parsing"));
        assert!(!prompt.contains("{unit_name}"));
        assert!(!prompt.contains("{n_long}"));
    }

    #[test]
    fn test_qna_template_placeholders() {
        assert_eq!(
            QNA_PROMPT.placeholders(),
            vec!["unit_name", "n_long", "n_short"]
        );
        assert!(TOPIC_TREE_PROMPT.placeholders().is_empty());
    }
}
