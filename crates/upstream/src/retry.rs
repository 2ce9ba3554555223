//! The one retry policy in the system.
//!
//! Up to four attempts, retrying only transient failures, with a fixed
//! exponential delay schedule of 0.8 s, 1.6 s and 3.2 s. Delays run on tokio
//! time so tests drive them deterministically with a paused clock.

use std::{future::Future, time::Duration};

use crate::error::{Result, UpstreamError};

/// Retry schedule for upstream calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(800),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    fn delay(&self, completed_attempts: u32) -> Duration {
        self.initial_delay * self.multiplier.pow(completed_attempts - 1)
    }
}

/// Run `operation` under `policy`, retrying transient failures only. The
/// last error is surfaced unchanged once the schedule is exhausted.
pub async fn retry<T, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.delay(attempt);
                log::debug!("transient upstream failure (attempt {attempt}), retrying in {delay:?}: {err}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
