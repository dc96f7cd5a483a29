//! Bounded retry with exponential backoff.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// How many times to try and how long to wait between tries.
///
/// After failed attempt `n` (1-based) the wait is `base_delay * 2^n`, so with
/// the default one second base the waits are 2s, 4s, 8s...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_secs(1),
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// A budget of zero still makes one attempt.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }
}

/// The last error once every attempt has failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryError<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `operation` until it succeeds or the policy's attempts are used up.
///
/// The closure receives the 1-based attempt number. No delay follows the
/// final attempt.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    error = %e,
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    "{} failed, retrying...",
                    label
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, attempts, "{} failed after all retries", label);
                return Err(RetryError {
                    attempts,
                    last_error: e,
                });
            }
        }
    }
}
