// file: src/pipeline/batch.rs
// description: sequential per-unit generation, persistence, progress and stop handling
// reference: coordinates the builder and the output writer for one run

use crate::error::Result;
use crate::exporter::OutputWriter;
use crate::models::{QnaDocument, TopicTree, Unit};
use crate::pipeline::progress::{ProgressSink, percent};
use crate::pipeline::qna::QnaSource;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Mutable bookkeeping for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    total_units: usize,
    completed_units: usize,
    stop_requested: bool,
}

impl RunState {
    pub fn new(total_units: usize) -> Self {
        Self {
            total_units,
            ..Self::default()
        }
    }

    pub fn total_units(&self) -> usize {
        self.total_units
    }

    pub fn completed_units(&self) -> usize {
        self.completed_units
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    pub fn complete_unit(&mut self) {
        self.completed_units = (self.completed_units + 1).min(self.total_units);
    }

    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn percent(&self) -> u8 {
        percent(self.completed_units, self.total_units)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total_units: usize,
    pub completed_units: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub questions: usize,
    pub files_written: Vec<PathBuf>,
    pub stopped: bool,
    pub duration_secs: u64,
}

impl BatchStats {
    pub fn success_rate(&self) -> f64 {
        if self.completed_units == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.completed_units as f64) * 100.0
    }

    /// Decides which stages run after generation. A stopped run still
    /// archives what it wrote but makes no further network calls.
    pub fn follow_up(&self, audio_requested: bool, archive_requested: bool) -> FollowUp {
        let has_output = !self.files_written.is_empty();
        FollowUp {
            synthesize_audio: audio_requested && has_output && !self.stopped,
            build_archives: archive_requested && has_output,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUp {
    pub synthesize_audio: bool,
    pub build_archives: bool,
}

pub struct BatchGenerator {
    writer: OutputWriter,
    write_json: bool,
}

impl BatchGenerator {
    pub fn new(writer: OutputWriter) -> Self {
        Self {
            writer,
            write_json: false,
        }
    }

    pub fn with_json(mut self, write_json: bool) -> Self {
        self.write_json = write_json;
        self
    }

    /// Builds and persists one document per unit in flatten order.
    ///
    /// Generation failures are logged and skipped. The stop predicate is
    /// checked only between units; files already written are kept. Write
    /// errors, and any other error from the source, abort the run.
    pub async fn run(
        &self,
        tree: &TopicTree,
        resume_text: &str,
        source: &dyn QnaSource,
        progress: Option<&dyn ProgressSink>,
        stop: Option<&dyn Fn() -> bool>,
    ) -> Result<BatchStats> {
        let start = Instant::now();
        let mut state = RunState::new(tree.unit_count());
        let mut stats = BatchStats {
            total_units: state.total_units(),
            ..BatchStats::default()
        };
        let mut last_reported = None;

        if state.total_units() == 0 {
            info!("Topic tree has no units; nothing to generate");
            report(progress, &mut last_reported, 100);
            return Ok(stats);
        }

        info!("Generating Q&A for {} unit(s)", state.total_units());

        let mut topic_documents: Vec<QnaDocument> = Vec::new();
        let mut current_topic: Option<&str> = None;

        for unit in tree.units() {
            if stop.is_some_and(|should_stop| should_stop()) {
                state.request_stop();
                warn!(
                    "Stop requested; ending after {}/{} unit(s)",
                    state.completed_units(),
                    state.total_units()
                );
                break;
            }

            if current_topic != Some(unit.topic) {
                current_topic = Some(unit.topic);
                topic_documents.clear();
            }

            if let Some(sink) = progress {
                sink.unit_started(&unit);
            }

            match source.build(resume_text, unit.subtopic).await {
                Ok(document) => {
                    let questions = document.question_count();
                    self.persist(&unit, document, &mut topic_documents, &mut stats)?;
                    stats.succeeded += 1;
                    stats.questions += questions;
                }
                Err(e) if e.is_unit_level() => {
                    warn!("Skipping {} / {}: {}", unit.topic, unit.subtopic, e);
                    stats.failed += 1;
                }
                Err(e) => return Err(e),
            }

            state.complete_unit();
            report(progress, &mut last_reported, state.percent());
        }

        if !state.stop_requested() && last_reported != Some(100) {
            report(progress, &mut last_reported, 100);
        }

        stats.completed_units = state.completed_units();
        stats.stopped = state.stop_requested();
        stats.duration_secs = start.elapsed().as_secs();

        info!(
            "Batch finished: {}/{} unit(s) attempted, {} succeeded, {} failed, {} question(s){}",
            stats.completed_units,
            stats.total_units,
            stats.succeeded,
            stats.failed,
            stats.questions,
            if stats.stopped { " (stopped)" } else { "" }
        );

        Ok(stats)
    }

    fn persist(
        &self,
        unit: &Unit<'_>,
        document: QnaDocument,
        topic_documents: &mut Vec<QnaDocument>,
        stats: &mut BatchStats,
    ) -> Result<()> {
        let text_path = self.writer.text_path(unit.topic, unit.subtopic);
        self.writer.write_text(&text_path, &document.to_text())?;
        stats.files_written.push(text_path);

        if self.write_json {
            topic_documents.push(document);
            let json_path = self.writer.json_path(unit.topic);
            self.writer.write_json(&json_path, topic_documents.as_slice())?;
            if !stats.files_written.contains(&json_path) {
                stats.files_written.push(json_path);
            }
        }

        Ok(())
    }
}

fn report(progress: Option<&dyn ProgressSink>, last_reported: &mut Option<u8>, value: u8) {
    if let Some(sink) = progress {
        sink.report(value);
    }
    *last_reported = Some(value);
}
