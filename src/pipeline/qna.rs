// file: src/pipeline/qna.rs
// description: per-unit q&a generation with bounded parse retries
// reference: gateway call, parse, validate, retry on parse failure only

use crate::config::GenerationConfig;
use crate::error::{PipelineError, Result};
use crate::llm::prompts::{QNA_SYSTEM_PROMPT, qna_prompt};
use crate::llm::{ModelGateway, parse_json_object};
use crate::models::QnaDocument;
use crate::pipeline::retry::{RetryError, with_retries};
use async_trait::async_trait;
use tracing::debug;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Anything that can produce the document for one unit.
#[async_trait]
pub trait QnaSource: Send + Sync {
    async fn build(&self, resume_text: &str, unit_name: &str) -> Result<QnaDocument>;
}

pub struct QnaBuilder<'a, G: ?Sized> {
    gateway: &'a G,
    long_questions: usize,
    short_questions: usize,
    max_attempts: u32,
}

impl<'a, G: ModelGateway + ?Sized> QnaBuilder<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self {
            gateway,
            long_questions: 10,
            short_questions: 10,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn from_config(gateway: &'a G, config: &GenerationConfig) -> Self {
        Self {
            gateway,
            long_questions: config.long_questions,
            short_questions: config.short_questions,
            max_attempts: config.max_attempts,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

#[async_trait]
impl<G: ModelGateway + ?Sized> QnaSource for QnaBuilder<'_, G> {
    async fn build(&self, resume_text: &str, unit_name: &str) -> Result<QnaDocument> {
        let prompt = qna_prompt(
            resume_text,
            unit_name,
            self.long_questions,
            self.short_questions,
        );

        let outcome = with_retries(
            self.max_attempts,
            |e| matches!(e, PipelineError::Parse(_)),
            |attempt| {
                let prompt = &prompt;
                async move {
                    debug!("Generating '{}' (attempt {})", unit_name, attempt);
                    let raw = self.gateway.generate(QNA_SYSTEM_PROMPT, prompt).await?;
                    parse_json_object(&raw)
                }
            },
        )
        .await;

        match outcome {
            Ok(object) => Ok(QnaDocument::from_model_object(&object, unit_name)),
            Err(RetryError::Exhausted { attempts, last }) => Err(PipelineError::Generation {
                unit: unit_name.to_string(),
                attempts,
                source: Box::new(last),
            }),
            Err(RetryError::Aborted(e)) => Err(e),
        }
    }
}
