// file: src/parser/mod.rs
// description: resume text extraction module exports
// reference: internal module structure

pub mod text;

pub use text::{SourceFormat, extract_text};
