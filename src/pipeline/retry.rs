// file: src/pipeline/retry.rs
// description: bounded retry combinator with explicit failure outcomes
// reference: replaces implicit catch-and-retry loops

use crate::error::PipelineError;
use std::future::Future;
use tracing::warn;

#[derive(Debug)]
pub enum RetryError {
    /// Every attempt failed with a retryable error.
    Exhausted { attempts: u32, last: PipelineError },
    /// An attempt failed with an error the predicate refused to retry.
    Aborted(PipelineError),
}

/// Runs `operation` up to `max_attempts` times (at least once). The attempt
/// number passed to the operation starts at 1.
pub async fn with_retries<T, F, Fut, P>(
    max_attempts: u32,
    is_retryable: P,
    mut operation: F,
) -> Result<T, RetryError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, PipelineError>>,
    P: Fn(&PipelineError) -> bool,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !is_retryable(&e) => return Err(RetryError::Aborted(e)),
            Err(e) if attempt >= max_attempts => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: e,
                });
            }
            Err(e) => {
                warn!("Attempt {}/{} failed: {}", attempt, max_attempts, e);
                attempt += 1;
            }
        }
    }
}
