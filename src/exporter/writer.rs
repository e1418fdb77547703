// file: src/exporter/writer.rs
// description: filesystem-safe naming and text/json writes under an output root
// reference: deterministic <topic>/<subtopic>.txt layout

use crate::error::{PipelineError, Result};
use crate::utils::patterns::UNSAFE_NAME_CHARS;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MAX_NAME_CHARS: usize = 120;
pub const FALLBACK_NAME: &str = "unit";

/// Strips everything but word characters, `-` and space (runs collapse to
/// `_`), truncates to [`MAX_NAME_CHARS`], and falls back to
/// [`FALLBACK_NAME`] when nothing is left.
pub fn safe_name(name: &str) -> String {
    let name = name.trim().replace('/', "-");
    let cleaned = UNSAFE_NAME_CHARS.replace_all(&name, "_");
    let truncated: String = cleaned.chars().take(MAX_NAME_CHARS).collect();

    if truncated.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        truncated
    }
}

#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Removes everything under the root and recreates it empty.
    pub fn reset(&self) -> Result<()> {
        if self.root.exists() {
            info!("Clearing previous output in {}", self.root.display());
            fs::remove_dir_all(&self.root)
                .map_err(|e| PipelineError::file_operation(&self.root, e))?;
        }
        fs::create_dir_all(&self.root).map_err(|e| PipelineError::file_operation(&self.root, e))
    }

    pub fn text_path(&self, topic: &str, subtopic: &str) -> PathBuf {
        self.root
            .join(safe_name(topic))
            .join(format!("{}.txt", safe_name(subtopic)))
    }

    pub fn json_path(&self, topic: &str) -> PathBuf {
        self.root.join(safe_name(topic)).join("qna.json")
    }

    pub fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        ensure_parent(path)?;
        fs::write(path, content).map_err(|e| PipelineError::file_operation(path, e))?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    pub fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value)?;
        self.write_text(path, &content)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PipelineError::file_operation(parent, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_safe_name_strips_unsafe_characters() {
        let name = safe_name("C++ / Pointers?");

        assert!(!name.is_empty());
        assert!(!name.contains('/'));
        assert!(!name.contains('+'));
        assert!(!name.contains('?'));
        assert!(name.chars().count() <= MAX_NAME_CHARS);
        assert_eq!(name, "C_ - Pointers_");
    }

    #[test]
    fn test_safe_name_fallback_and_truncation() {
        assert_eq!(safe_name("   "), FALLBACK_NAME);
        assert_eq!(safe_name("..."), "_");

        let long = "é".repeat(300);
        let name = safe_name(&long);
        assert_eq!(name.chars().count(), MAX_NAME_CHARS);
    }

    #[test]
    fn test_safe_name_keeps_word_characters() {
        assert_eq!(safe_name("Machine Learning-101"), "Machine Learning-101");
        assert_eq!(safe_name("Données"), "Données");
    }

    #[test]
    fn test_writes_create_parent_directories() {
        let temp = TempDir::new().unwrap();
        let writer = OutputWriter::new(temp.path().join("out"));

        let text_path = writer.text_path("Data Structures", "Hash Maps?");
        writer.write_text(&text_path, "Unit: Hash Maps\n").unwrap();
        writer
            .write_json(&writer.json_path("Data Structures"), &json!([{"unit": "x"}]))
            .unwrap();

        assert_eq!(
            text_path,
            temp.path().join("out/Data Structures/Hash Maps_.txt")
        );
        assert_eq!(fs::read_to_string(&text_path).unwrap(), "Unit: Hash Maps\n");
        assert!(temp.path().join("out/Data Structures/qna.json").is_file());
    }

    #[test]
    fn test_reset_clears_previous_output() {
        let temp = TempDir::new().unwrap();
        let writer = OutputWriter::new(temp.path().join("out"));
        let stale = writer.text_path("Old", "Stale");
        writer.write_text(&stale, "old").unwrap();

        writer.reset().unwrap();

        assert!(!stale.exists());
        assert!(writer.root().is_dir());
    }
}
