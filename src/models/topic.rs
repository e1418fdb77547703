// file: src/models/topic.rs
// description: topic tree model with first-seen ordering and per-topic dedup
// reference: internal data structures

use serde::{Deserialize, Serialize};

pub const DEFAULT_TOPIC: &str = "General";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNode {
    pub topic: String,
    pub subtopics: Vec<String>,
}

/// Merged topic hierarchy. Topic names are unique and ordered by first
/// appearance; subtopics are unique within their topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TopicTreeFile")]
pub struct TopicTree {
    topics: Vec<TopicNode>,
}

#[derive(Deserialize)]
struct TopicTreeFile {
    #[serde(default)]
    topics: Vec<TopicNode>,
}

impl From<TopicTreeFile> for TopicTree {
    fn from(file: TopicTreeFile) -> Self {
        let mut tree = TopicTree::new();
        for node in file.topics {
            tree.merge_topic(&node.topic, node.subtopics.iter().map(String::as_str));
        }
        tree
    }
}

/// One (topic, subtopic) pair of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit<'a> {
    pub topic: &'a str,
    pub subtopic: &'a str,
}

impl TopicTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one topic entry. Blank topic names fall back to
    /// [`DEFAULT_TOPIC`]; blank subtopics are dropped.
    pub fn merge_topic<'s>(&mut self, topic: &str, subtopics: impl IntoIterator<Item = &'s str>) {
        let name = match topic.trim() {
            "" => DEFAULT_TOPIC,
            trimmed => trimmed,
        };

        let index = match self.topics.iter().position(|n| n.topic == name) {
            Some(index) => index,
            None => {
                self.topics.push(TopicNode {
                    topic: name.to_string(),
                    subtopics: Vec::new(),
                });
                self.topics.len() - 1
            }
        };

        let node = &mut self.topics[index];
        for subtopic in subtopics {
            let subtopic = subtopic.trim();
            if subtopic.is_empty() || node.subtopics.iter().any(|s| s == subtopic) {
                continue;
            }
            node.subtopics.push(subtopic.to_string());
        }
    }

    pub fn topics(&self) -> &[TopicNode] {
        &self.topics
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn unit_count(&self) -> usize {
        self.topics.iter().map(|n| n.subtopics.len()).sum()
    }

    /// Flatten order: topic insertion order, then subtopic order.
    pub fn units(&self) -> impl Iterator<Item = Unit<'_>> {
        self.topics.iter().flat_map(|node| {
            node.subtopics.iter().map(move |subtopic| Unit {
                topic: &node.topic,
                subtopic,
            })
        })
    }

    /// Keeps only the first `max_topics` topics.
    pub fn truncate(&mut self, max_topics: usize) {
        self.topics.truncate(max_topics);
    }
}
