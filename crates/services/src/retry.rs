//! Retry with exponential backoff for flaky remote calls.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::error::Transient;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first call.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
}

impl RetryPolicy {
    /// Question generation: 3 attempts, 2 s then 4 s.
    #[must_use]
    pub const fn quiz() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            multiplier: 2,
        }
    }

    /// Speech synthesis: 3 attempts, 1 s then 2 s.
    #[must_use]
    pub const fn speech() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            multiplier: 2,
        }
    }

    #[must_use]
    pub const fn no_delay(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            multiplier: 2,
        }
    }

    /// Delay after the given failed attempt (0-indexed).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::quiz()
    }
}

/// Runs `op` until it succeeds, fails permanently, or attempts run out.
///
/// # Errors
///
/// Returns the last error from `op`.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt + 1 < max_attempts && err.is_transient() => {
                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    label,
                    attempt = attempt + 1,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::error::GenerationError;

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy::quiz();
        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(4));
        assert_eq!(RetryPolicy::speech().delay_for_attempt(2), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn succeeds_on_a_later_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = retry(&RetryPolicy::no_delay(3), "test", || {
            let calls = Arc::clone(&calls);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(GenerationError::EmptyResponse)
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<(), _> = retry(&RetryPolicy::no_delay(3), "test", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(GenerationError::EmptyResponse)
            }
        })
        .await;

        assert!(matches!(result, Err(GenerationError::EmptyResponse)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_stop_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<(), _> = retry(&RetryPolicy::no_delay(3), "test", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(GenerationError::Disabled)
            }
        })
        .await;

        assert!(matches!(result, Err(GenerationError::Disabled)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_attempts() {
        let started = tokio::time::Instant::now();
        let result: Result<(), _> = retry(&RetryPolicy::quiz(), "test", || async {
            Err(GenerationError::EmptyResponse)
        })
        .await;

        assert!(result.is_err());
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(6) && waited < Duration::from_secs(7));
    }
}
