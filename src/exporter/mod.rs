// file: src/exporter/mod.rs
// description: output tree writing and archive packaging exports
// reference: internal module structure

pub mod archive;
pub mod writer;

pub use archive::{zip_dir, zip_files};
pub use writer::{OutputWriter, safe_name};
