// file: src/speech/mod.rs
// description: speech synthesis module exports
// reference: internal module structure

pub mod tts;

pub use tts::{GoogleTranslateTts, SpeechSynthesizer, VoiceConfig, synthesize_tree};
