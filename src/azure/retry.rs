//! Bounded retry with exponential backoff for outbound calls.
//!
//! The delay before retrying after attempt `i` (0-based) is
//! `base_delay * 2^i`. No jitter, no circuit breaker, nothing kept between
//! calls.
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::AppResult;

#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero is treated as one.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        RetryPolicy { max_attempts, base_delay }
    }

    /// Delay to wait after the failed attempt with 0-based index `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Run `f` until it succeeds or the attempts are used up. The last error
    /// is returned unchanged.
    pub async fn run<F, Fut, T>(&self, operation: &str, mut f: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(operation, attempt = attempt + 1, "Call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if attempt + 1 >= max_attempts => {
                    tracing::error!(operation, attempts = attempt + 1, error = %e, "Giving up after final attempt");
                    return Err(e);
                }
                Err(e) => {
                    let backoff = self.delay_for(attempt);
                    tracing::warn!(
                        operation,
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}
