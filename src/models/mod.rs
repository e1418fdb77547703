// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod qna;
pub mod topic;

pub use qna::{QaPair, QnaDocument};
pub use topic::{DEFAULT_TOPIC, TopicNode, TopicTree, Unit};
