// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Response parse error: {0}")]
    Parse(String),

    #[error("Model gateway error: {0}")]
    Model(String),

    #[error("Generation failed for '{unit}' after {attempts} attempts: {source}")]
    Generation {
        unit: String,
        attempts: u32,
        #[source]
        source: Box<PipelineError>,
    },

    #[error("Text extraction failed for {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl PipelineError {
    pub fn file_operation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOperation {
            path: path.into(),
            source,
        }
    }

    /// Errors that are contained at chunk/unit level instead of aborting a run.
    pub fn is_unit_level(&self) -> bool {
        matches!(
            self,
            Self::Parse(_) | Self::Model(_) | Self::Generation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_message() {
        let err = PipelineError::Generation {
            unit: "Sorting".to_string(),
            attempts: 5,
            source: Box::new(PipelineError::Parse("no object".to_string())),
        };

        let message = err.to_string();
        assert!(message.contains("Sorting"));
        assert!(message.contains("5 attempts"));
        assert!(message.contains("no object"));
    }

    #[test]
    fn test_unit_level_classification() {
        assert!(PipelineError::Parse("x".into()).is_unit_level());
        assert!(PipelineError::Model("x".into()).is_unit_level());
        assert!(!PipelineError::Io(std::io::Error::other("disk")).is_unit_level());
    }
}
