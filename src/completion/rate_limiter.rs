// Per-model fixed-interval gate for completion calls.
//
// Generative backends meter quota per model (Gemini's free tier allows a
// handful of requests per minute on the pro models). Each model identifier
// gets its own gate: a call waits until `interval` has passed since the
// previous call to the same model. Calls to different models never wait on
// each other, which keeps the discovery sweep moving.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::debug;

/// Rate limiter keyed by model identifier.
#[derive(Clone)]
pub struct ModelRateLimiter {
    interval: Duration,
    last_request: Arc<Mutex<HashMap<String, Instant>>>,
}

impl ModelRateLimiter {
    /// Allow `requests_per_minute` calls per minute to each model.
    ///
    /// Fails for rates that are not positive, or so small that the interval
    /// between calls does not fit in a `Duration`.
    pub fn per_minute(requests_per_minute: f64) -> Result<Self> {
        Ok(Self::with_interval(interval_for(requests_per_minute)?))
    }

    /// Require at least `interval` between calls to the same model.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until a call to `model_id` is allowed, then record it.
    ///
    /// The slot is reserved before sleeping, so concurrent callers for the
    /// same model queue up one interval apart instead of all waking at once.
    pub async fn acquire(&self, model_id: &str) {
        let wait = {
            let mut last = self.last_request.lock().await;
            let now = Instant::now();
            let slot = match last.get(model_id) {
                Some(&prev) if prev + self.interval > now => prev + self.interval,
                _ => now,
            };
            last.insert(model_id.to_string(), slot);
            slot.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            debug!(
                model = model_id,
                delay_ms = wait.as_millis() as u64,
                "Pacing completion call"
            );
            tokio::time::sleep(wait).await;
        }
    }
}

/// Time between calls for a per-minute rate.
pub fn interval_for(requests_per_minute: f64) -> Result<Duration> {
    if !requests_per_minute.is_finite() || requests_per_minute <= 0.0 {
        anyhow::bail!("Request rate must be a positive number, got {requests_per_minute}");
    }
    Duration::try_from_secs_f64(60.0 / requests_per_minute).map_err(|_| {
        anyhow::anyhow!(
            "Request rate {requests_per_minute}/min is too low: the wait between calls cannot be represented"
        )
    })
}
