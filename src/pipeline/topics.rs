// file: src/pipeline/topics.rs
// description: chunked topic-tree extraction and merge over the model gateway
// reference: one gateway call per chunk, failures contained per chunk

use crate::llm::prompts::{TOPIC_SYSTEM_PROMPT, topic_chunk_prompt};
use crate::llm::{ModelGateway, parse_json_object};
use crate::models::{DEFAULT_TOPIC, TopicTree};
use crate::pipeline::progress::{ProgressSink, percent};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

pub const MAX_CHUNK_CHARS: usize = 12_000;

/// Contiguous, non-overlapping slices of at most `max_chars` characters.
/// Text within the bound, including empty text, is a single chunk.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    loop {
        match rest.char_indices().nth(max_chars) {
            Some((split, _)) => {
                let (head, tail) = rest.split_at(split);
                chunks.push(head);
                rest = tail;
            }
            None => {
                if chunks.is_empty() || !rest.is_empty() {
                    chunks.push(rest);
                }
                return chunks;
            }
        }
    }
}

pub struct TopicExtractor<'a, G: ?Sized> {
    gateway: &'a G,
    max_chunk_chars: usize,
}

impl<'a, G: ModelGateway + ?Sized> TopicExtractor<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self {
            gateway,
            max_chunk_chars: MAX_CHUNK_CHARS,
        }
    }

    pub fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars;
        self
    }

    /// Never fails as a whole: a chunk whose call or parse fails adds no
    /// topics.
    pub async fn extract(&self, full_text: &str, progress: Option<&dyn ProgressSink>) -> TopicTree {
        let chunks = chunk_text(full_text, self.max_chunk_chars);
        let total = chunks.len();
        let mut tree = TopicTree::new();

        info!("Extracting topics from {} chunk(s)", total);

        for (index, chunk) in chunks.iter().enumerate() {
            let prompt = topic_chunk_prompt(chunk, index, total);

            let parsed = match self.gateway.generate(TOPIC_SYSTEM_PROMPT, &prompt).await {
                Ok(raw) => parse_json_object(&raw),
                Err(e) => Err(e),
            };

            match parsed {
                Ok(object) => {
                    let before = tree.unit_count();
                    merge_response(&mut tree, &object);
                    debug!(
                        "Chunk {}/{} added {} subtopic(s)",
                        index + 1,
                        total,
                        tree.unit_count() - before
                    );
                }
                Err(e) => warn!("Skipping chunk {}/{}: {}", index + 1, total, e),
            }

            if let Some(sink) = progress {
                sink.report(percent(index + 1, total));
            }
        }

        info!(
            "Topic tree has {} topic(s) and {} unit(s)",
            tree.topics().len(),
            tree.unit_count()
        );

        tree
    }
}

fn merge_response(tree: &mut TopicTree, object: &Map<String, Value>) {
    let Some(entries) = object.get("topics").and_then(Value::as_array) else {
        warn!("Model response has no topics array");
        return;
    };

    for entry in entries.iter().filter_map(Value::as_object) {
        let topic = entry
            .get("topic")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_TOPIC);

        let subtopics = entry
            .get("subtopics")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();

        tree.merge_topic(topic, subtopics);
    }
}
