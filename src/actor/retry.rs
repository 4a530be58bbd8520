//! Capped exponential backoff for generation calls.
//!
//! Mailbox calls are not retried here: a failed page or mutation is surfaced
//! and the user retries by repeating the action.

use std::future::Future;
use std::time::Duration;

use crate::error::MailError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first call
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500), Duration::from_secs(10))
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
        }
    }

    /// Wait before each retry: doubling, capped at `max_delay`
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::successors(Some(self.initial_delay.min(self.max_delay)), |d| {
            Some(d.saturating_mul(2).min(self.max_delay))
        })
        .take(self.max_retries as usize)
    }
}

/// Run `operation`, retrying while it fails with a retryable error.
///
/// `NotFound`, `Invalid` and `Unavailable` come back on the first attempt.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T, MailError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MailError>>,
{
    let mut delays = policy.delays();
    let mut attempt = 1;
    loop {
        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => e,
        };
        let Some(delay) = delays.next() else {
            tracing::warn!("Giving up after {} attempts: {}", attempt, error);
            return Err(error);
        };
        tracing::warn!(
            "Attempt {}/{} failed: {}; retrying in {:?}",
            attempt,
            policy.max_retries + 1,
            error,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::from_millis(1), Duration::from_millis(5))
    }

    #[test]
    fn test_delays_double_and_cap() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100), Duration::from_millis(350));
        let delays: Vec<u64> = policy.delays().map(|d| d.as_millis() as u64).collect();
        assert_eq!(delays, vec![100, 200, 350, 350, 350]);
        assert_eq!(quick(0).delays().count(), 0);
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&quick(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(MailError::transient("timeout"))
                } else {
                    Ok("summary")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("summary"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<(), MailError> = with_retry(&quick(2), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(MailError::transient("down")) }
        })
        .await;

        assert_eq!(result, Err(MailError::transient("down")));
        // First call plus two retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_returns_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), MailError> = with_retry(&quick(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(MailError::unavailable("AI generation")) }
        })
        .await;

        assert!(matches!(result, Err(MailError::Unavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
