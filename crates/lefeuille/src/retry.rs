// Retry policies for generation calls

use crate::error::GenerationError;
use backon::{ConstantBuilder, ExponentialBuilder, Retryable};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How failed generation calls are retried.
///
/// Only errors classified as retryable by
/// [`GenerationError::is_retryable`] trigger another attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Single attempt
    #[default]
    None,
    /// Fixed number of attempts with a constant pause
    Fixed {
        /// Total attempts, including the first
        attempts: usize,
        /// Pause between attempts
        delay_ms: u64,
    },
    /// Exponential backoff
    Backoff {
        /// Total attempts, including the first
        max_attempts: usize,
        /// First pause
        initial_ms: u64,
        /// Longest pause
        max_ms: u64,
        /// Growth factor between pauses
        factor: f32,
    },
}

impl RetryPolicy {
    /// Upper bound on attempts
    pub fn max_attempts(&self) -> usize {
        match self {
            RetryPolicy::None => 1,
            RetryPolicy::Fixed { attempts, .. } => (*attempts).max(1),
            RetryPolicy::Backoff { max_attempts, .. } => (*max_attempts).max(1),
        }
    }

    /// Run `op` under this policy
    pub async fn run<F, Fut, T>(&self, op: F) -> Result<T, GenerationError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GenerationError>>,
    {
        let retries = self.max_attempts() - 1;
        let notify = |err: &GenerationError, pause: Duration| {
            warn!("Generation failed ({}); retrying in {:?}", err, pause);
        };

        match self {
            RetryPolicy::None => {
                let mut op = op;
                op().await
            }
            RetryPolicy::Fixed { delay_ms, .. } => {
                let backoff = ConstantBuilder::default()
                    .with_delay(Duration::from_millis(*delay_ms))
                    .with_max_times(retries);
                op.retry(backoff)
                    .when(GenerationError::is_retryable)
                    .notify(notify)
                    .await
            }
            RetryPolicy::Backoff {
                initial_ms,
                max_ms,
                factor,
                ..
            } => {
                let backoff = ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(*initial_ms))
                    .with_max_delay(Duration::from_millis(*max_ms))
                    .with_factor(*factor)
                    .with_max_times(retries);
                op.retry(backoff)
                    .when(GenerationError::is_retryable)
                    .notify(notify)
                    .await
            }
        }
    }
}
