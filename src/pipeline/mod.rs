// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod batch;
pub mod progress;
pub mod qna;
pub mod retry;
pub mod topics;

pub use batch::{BatchGenerator, BatchStats, FollowUp, RunState};
pub use progress::{ProgressSink, ProgressTracker, percent};
pub use qna::{QnaBuilder, QnaSource};
pub use retry::{RetryError, with_retries};
pub use topics::{MAX_CHUNK_CHARS, TopicExtractor, chunk_text};
