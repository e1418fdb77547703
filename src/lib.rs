// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod llm;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod speech;
pub mod utils;

pub use config::{Config, GenerationConfig, LlmConfig, OutputConfig, SpeechConfig};
pub use error::{PipelineError, Result};
pub use exporter::{OutputWriter, safe_name, zip_dir, zip_files};
pub use llm::{GroqChatClient, ModelGateway};
pub use models::{QaPair, QnaDocument, TopicNode, TopicTree, Unit};
pub use parser::{SourceFormat, extract_text};
pub use pipeline::{
    BatchGenerator, BatchStats, ProgressSink, ProgressTracker, QnaBuilder, QnaSource,
    TopicExtractor,
};
pub use speech::{GoogleTranslateTts, SpeechSynthesizer, VoiceConfig, synthesize_tree};
pub use utils::{PromptTemplate, Validator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.speech.voice(), VoiceConfig::default());
        assert!(TopicTree::default().is_empty());
    }
}
