//! Backoff policy for completion calls
//!
//! Only failures the caller classifies as transient are retried; everything
//! else is returned on the first attempt.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How many times, and how patiently, a failed completion is retried
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts in total, the first call included
    pub max_attempts: u32,
    /// Wait after the first failure
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,
    /// Upper bound for any single wait
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
    /// Growth factor between consecutive waits
    pub multiplier: f64,
    /// Stretch each wait by up to a quarter, at random
    pub jitter: bool,
    /// Provider statuses worth another attempt
    pub retry_on_status: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: true,
            retry_on_status: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    /// Wait before retry number `retry`, counted from zero.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(retry.min(i32::MAX as u32) as i32);
        let delay = Duration::try_from_secs_f64(self.initial_delay.as_secs_f64() * factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay));

        if self.jitter {
            delay.mul_f64(1.0 + rand::thread_rng().gen_range(0.0..0.25))
        } else {
            delay
        }
    }
}

/// Run `operation` until it succeeds, fails permanently, or runs out of
/// attempts. The last error is returned as-is.
pub async fn with_retry<F, Fut, T, E, P>(
    config: &RetryConfig,
    operation: F,
    is_transient: P,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && is_transient(&e) => {
                let delay = config.backoff(attempt - 1);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient completion failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
