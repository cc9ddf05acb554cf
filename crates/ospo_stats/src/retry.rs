//! Bounded retry policy for transient failures.
//!
//! The policy is an explicit value composed around a call with [`with_retry`].
//! Only errors the caller classifies as retryable are retried; everything else
//! returns on the first failure.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::crawl::{CrawlProgress, ProgressCallback};

/// Total attempts (first call included) before a transient error surfaces.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// First backoff delay in milliseconds.
pub const INITIAL_BACKOFF_MS: u64 = 2_000;

/// Upper bound for a single backoff delay in milliseconds.
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Retry policy: attempt budget plus an exponential backoff schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt. Doubles on every further attempt.
    pub min_delay: Duration,
    /// Cap applied to every delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_delay: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_delay: Duration::from_millis(MAX_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Build the backon strategy for this policy.
    #[must_use]
    pub fn into_backoff(self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_factor(2.0)
            .with_max_times(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// Run `operation` under `policy`, retrying errors for which `is_retryable`
/// returns true.
///
/// Every backoff is logged at debug level and reported as
/// [`CrawlProgress::RetryBackoff`]. When the attempts are exhausted the last
/// error is returned.
pub async fn with_retry<T, E, F, Fut, IsRetryable>(
    mut operation: F,
    policy: &RetryPolicy,
    is_retryable: IsRetryable,
    context: &str,
    on_progress: Option<&ProgressCallback>,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    IsRetryable: Fn(&E) -> bool,
{
    let attempt = AtomicU32::new(0);

    let retry_op = || {
        attempt.fetch_add(1, Ordering::SeqCst);
        operation()
    };

    retry_op
        .retry(policy.clone().into_backoff())
        .notify(|err: &E, dur: Duration| {
            let current_attempt = attempt.load(Ordering::SeqCst);
            if let Some(cb) = on_progress {
                cb(CrawlProgress::RetryBackoff {
                    context: context.to_string(),
                    retry_after_ms: dur.as_millis() as u64,
                    attempt: current_attempt,
                });
            }
            tracing::debug!(
                context,
                attempt = current_attempt,
                delay_ms = dur.as_millis() as u64,
                error = %err,
                "Transient failure, backing off"
            );
        })
        .when(|e: &E| is_retryable(e))
        .await
}
