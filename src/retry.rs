//! Retry Mechanism Module
//!
//! Bounded retry with exponential backoff and jitter, applied only to
//! transient failures: transport errors and upstream 5xx. Dispatch never
//! retries unless the caller opts in with a [`RetryPolicy`].

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::DispatchError;

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Multiplier applied per retry (exponential backoff).
    pub backoff_multiplier: f64,
    /// Jitter as a fraction of the delay (0.0 disables jitter).
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of retries after the initial attempt.
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry.
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the upper bound on any single delay.
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    pub const fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Set the jitter factor, clamped to `0.0..=1.0`.
    pub fn with_jitter_factor(mut self, factor: f64) -> Self {
        self.jitter_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Delay for the given zero-based retry attempt.
    fn delay_for(&self, attempt: u32) -> Duration {
        let base =
            self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        let capped = Duration::from_millis(base as u64).min(self.max_delay);
        if self.jitter_factor > 0.0 {
            self.add_jitter(capped)
        } else {
            capped
        }
    }

    fn add_jitter(&self, delay: Duration) -> Duration {
        let mut rng = rand::thread_rng();
        let jitter_range = delay.as_millis() as f64 * self.jitter_factor;
        let jitter = rng.gen_range(-jitter_range..=jitter_range);
        let with_jitter = delay.as_millis() as f64 + jitter;
        Duration::from_millis(with_jitter.max(0.0) as u64)
    }
}

/// Run `operation` until it succeeds, fails terminally, or retries are
/// exhausted. Only [`DispatchError::is_retryable`] failures are retried.
pub async fn retry<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T, DispatchError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, DispatchError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_retryable() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying after transient failure"
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
