// file: src/llm/mod.rs
// description: model gateway, prompt formatting and response parsing exports
// reference: internal module structure

pub mod client;
pub mod prompts;
pub mod response;

pub use client::{GroqChatClient, ModelGateway};
pub use response::parse_json_object;
