// Pacing and retry around any completion backend.
//
// GuardedClient is itself a CompletionClient, so the pipelines don't know
// whether they talk to a bare backend or a guarded one. Every attempt,
// retries included, first passes the model's rate-limit gate.

use async_trait::async_trait;

use super::error::CompletionError;
use super::rate_limiter::ModelRateLimiter;
use super::retry::{with_retry, RetryPolicy};
use super::traits::CompletionClient;

pub struct GuardedClient<C> {
    inner: C,
    limiter: ModelRateLimiter,
    policy: RetryPolicy,
}

impl<C: CompletionClient> GuardedClient<C> {
    pub fn new(inner: C, limiter: ModelRateLimiter, policy: RetryPolicy) -> Self {
        Self {
            inner,
            limiter,
            policy,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: CompletionClient> CompletionClient for GuardedClient<C> {
    async fn complete(&self, prompt: &str, model_id: &str) -> Result<String, CompletionError> {
        with_retry(&self.policy, || async move {
            self.limiter.acquire(model_id).await;
            self.inner.complete(prompt, model_id).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Fails with 503 for the first `failures` calls.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl CompletionClient for Flaky {
        async fn complete(&self, prompt: &str, model_id: &str) -> Result<String, CompletionError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                return Err(CompletionError::Http {
                    backend: "test",
                    status: 503,
                    body: "overloaded".to_string(),
                });
            }
            Ok(format!("{model_id}:{prompt}"))
        }
    }

    fn quick_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
        }
    }

    #[tokio::test]
    async fn test_guarded_client_recovers_from_transient_failure() {
        let guarded = GuardedClient::new(
            Flaky {
                failures: 2,
                calls: AtomicU32::new(0),
            },
            ModelRateLimiter::with_interval(Duration::from_millis(1)),
            quick_policy(),
        );

        let text = guarded.complete("hello", "m").await.unwrap();
        assert_eq!(text, "m:hello");
        assert_eq!(guarded.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_guarded_client_surfaces_exhausted_retries() {
        let guarded = GuardedClient::new(
            Flaky {
                failures: 10,
                calls: AtomicU32::new(0),
            },
            ModelRateLimiter::with_interval(Duration::from_millis(1)),
            RetryPolicy::none(),
        );

        let err = guarded.complete("hello", "m").await.unwrap_err();
        assert!(matches!(err, CompletionError::Http { status: 503, .. }));
        assert_eq!(guarded.inner().calls.load(Ordering::SeqCst), 1);
    }
}
