// file: src/pipeline/progress.rs
// description: percentage progress sinks and terminal progress bars per stage
// reference: uses indicatif for progress bars

use crate::models::Unit;
use indicatif::{ProgressBar, ProgressStyle};

/// Receives integer percentages (0..=100) synchronously from a running stage.
/// Implementations must return quickly; they run on the pipeline's thread of
/// control.
pub trait ProgressSink {
    fn report(&self, percent: u8);

    /// Called before a batch unit starts.
    fn unit_started(&self, _unit: &Unit<'_>) {}
}

impl<F> ProgressSink for F
where
    F: Fn(u8),
{
    fn report(&self, percent: u8) {
        self(percent)
    }
}

/// `round(done / total * 100)`, clamped to 100; an empty total is complete.
pub fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let value = (done as f64 / total as f64 * 100.0).round();
    value.clamp(0.0, 100.0) as u8
}

/// One terminal bar for one pipeline stage, measured in percent.
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn with_color(stage: &str, colored: bool) -> Self {
        let bar = create_progress_bar(colored);
        bar.set_prefix(stage.to_string());
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_with_message("done");
        }
    }

    pub fn abandon(&self, message: &'static str) {
        self.bar.abandon_with_message(message);
    }
}

impl ProgressSink for ProgressTracker {
    fn report(&self, percent: u8) {
        self.bar.set_position(u64::from(percent.min(100)));
    }

    fn unit_started(&self, unit: &Unit<'_>) {
        self.bar
            .set_message(format!("{} / {}", unit.topic, unit.subtopic));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(colored: bool) -> ProgressBar {
    let bar = ProgressBar::new(100);
    if colored {
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} {prefix:.bold} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}",
                )
                .expect("Failed to create progress bar template")
                .progress_chars("█▓▒░"),
        );
    } else {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} {prefix} [{elapsed_precise}] [{bar:40}] {pos:>3}% {msg}")
                .expect("Failed to create progress bar template")
                .progress_chars("=>-"),
        );
    }
    bar
}
