// Retry with exponential backoff

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::config::LLMConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, the first one included.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 7,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &LLMConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
        }
    }

    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay after the `attempt`-th failure (1-based). A server hint wins over the
    /// exponential schedule but is still capped.
    pub fn delay_for(&self, attempt: u32, hint: Option<Duration>) -> Duration {
        let exponential = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1).min(16)));
        hint.unwrap_or(exponential).min(self.max_delay)
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent. Both outcomes carry the number of attempts made.
pub async fn with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    is_retryable: impl Fn(&E) -> bool,
    retry_hint: impl Fn(&E) -> Option<Duration>,
    mut operation: F,
) -> Result<(T, u32), (E, u32)>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation(attempt).await {
            Ok(result) => return Ok((result, attempt)),
            Err(error) => {
                if attempt >= max_attempts || !is_retryable(&error) {
                    return Err((error, attempt));
                }

                let delay = policy.delay_for(attempt, retry_hint(&error));
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Transient failure, retrying"
                );
                if !delay.is_zero() {
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct Flaky(bool);

    impl std::fmt::Display for Flaky {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "flaky(transient={})", self.0)
        }
    }

    #[test]
    fn test_delay_schedule_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 7,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
        };
        assert_eq!(policy.delay_for(1, None), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2, None), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3, None), Duration::from_millis(400));
        assert_eq!(policy.delay_for(4, None), Duration::from_millis(500));
        assert_eq!(policy.delay_for(60, None), Duration::from_millis(500));
        assert_eq!(
            policy.delay_for(1, Some(Duration::from_millis(300))),
            Duration::from_millis(300)
        );
        assert_eq!(
            policy.delay_for(1, Some(Duration::from_secs(30))),
            Duration::from_millis(500)
        );
    }

    #[tokio::test]
    async fn test_succeeds_on_last_allowed_attempt() {
        let calls = AtomicU32::new(0);
        let result = with_retry(
            &RetryPolicy::immediate(7),
            |e: &Flaky| e.0,
            |_| None,
            |_| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 7 {
                        Err(Flaky(true))
                    } else {
                        Ok("done")
                    }
                }
            },
        )
        .await;

        assert!(matches!(result, Ok(("done", 7))));
        assert_eq!(calls.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<((), u32), (Flaky, u32)> = with_retry(
            &RetryPolicy::immediate(7),
            |e: &Flaky| e.0,
            |_| None,
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Flaky(true)) }
            },
        )
        .await;

        assert!(matches!(result, Err((_, 7))));
        assert_eq!(calls.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<((), u32), (Flaky, u32)> = with_retry(
            &RetryPolicy::immediate(7),
            |e: &Flaky| e.0,
            |_| None,
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Flaky(false)) }
            },
        )
        .await;

        assert!(matches!(result, Err((_, 1))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
