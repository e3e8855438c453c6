// Retry with exponential backoff for transient backend failures.
//
// Quota errors (429) and 5xx responses are common when sweeping several
// models against one large prompt. A retryable failure is retried up to
// `max_retries` times, waiting base * 2^attempt (capped) with +/- 25%
// jitter between attempts. Anything else is returned immediately.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::error::CompletionError;

/// Bounded retry schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Never retry.
    pub fn none() -> Self {
        Self::with_max_retries(0)
    }

    /// Un-jittered delay before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Run `operation` until it succeeds, fails permanently, or the policy
/// runs out of attempts.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, operation: F) -> Result<T, CompletionError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, CompletionError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retryable() || attempt >= policy.max_retries {
                    return Err(err);
                }

                attempt += 1;
                let delay = jitter(policy.backoff(attempt));

                warn!(
                    attempt = attempt,
                    max_retries = policy.max_retries,
                    backoff_secs = delay.as_secs_f64(),
                    error = %err,
                    "Transient completion failure, retrying in {:.1}s",
                    delay.as_secs_f64(),
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Scale `delay` by a factor in [0.75, 1.25) taken from the clock's
/// sub-second nanoseconds.
fn jitter(delay: Duration) -> Duration {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    let factor = 0.75 + (nanos % 500) as f64 / 1000.0;
    Duration::from_secs_f64(delay.as_secs_f64() * factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
        }
    }

    fn quota_error() -> CompletionError {
        CompletionError::Http {
            backend: "gemini",
            status: 429,
            body: "RESOURCE_EXHAUSTED".to_string(),
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(4));
        assert_eq!(policy.backoff(2), Duration::from_secs(8));
        assert_eq!(policy.backoff(5), Duration::from_secs(60));
        assert_eq!(policy.backoff(40), Duration::from_secs(60));
    }

    #[test]
    fn test_jitter_stays_within_a_quarter() {
        let base = Duration::from_secs(4);
        for _ in 0..100 {
            let j = jitter(base);
            assert!(j >= Duration::from_secs(3) && j <= Duration::from_secs(5));
        }
    }

    #[tokio::test]
    async fn test_retries_transient_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_policy(3), || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(quota_error())
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast_policy(2), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(quota_error()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast_policy(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(CompletionError::Http {
                    backend: "openai",
                    status: 401,
                    body: "bad key".to_string(),
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
