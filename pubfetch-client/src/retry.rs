//! Retry helper for transient E-utilities and translation failures

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, FixedInterval};
use tracing::{debug, warn};

/// Errors that know whether another attempt could succeed
pub trait RetryableError {
    fn is_retryable(&self) -> bool;

    /// Short human-readable reason, used in retry logs
    fn retry_reason(&self) -> &str;
}

/// How the delay grows between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `initial_delay`, doubling per attempt, capped at `max_delay`
    Exponential,
    /// `initial_delay` between every attempt
    Fixed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt; 0 disables retrying
    pub max_retries: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub use_jitter: bool,
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            use_jitter: true,
            backoff: Backoff::Exponential,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed delay between attempts, without jitter
    pub fn fixed(max_retries: usize, delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay: delay,
            max_delay: delay,
            use_jitter: false,
            backoff: Backoff::Fixed,
        }
    }

    /// No retries at all
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// The sequence of delays slept between attempts
    pub fn delays(&self) -> Vec<Duration> {
        let base: Vec<Duration> = match self.backoff {
            Backoff::Exponential => {
                let initial_ms = self.initial_delay.as_millis().max(2) as u64;
                ExponentialBackoff::from_millis(2)
                    .factor(initial_ms / 2)
                    .max_delay(self.max_delay)
                    .take(self.max_retries)
                    .collect()
            }
            Backoff::Fixed => FixedInterval::new(self.initial_delay)
                .take(self.max_retries)
                .collect(),
        };

        if self.use_jitter {
            let mut rng = rand::thread_rng();
            base.into_iter()
                .map(|d| d.mul_f64(rng.gen_range(0.5..=1.0)))
                .collect()
        } else {
            base
        }
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or the
/// configured retries are exhausted
pub async fn with_retry<F, Fut, T, E>(
    mut operation: F,
    config: &RetryConfig,
    operation_name: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + Display,
{
    let mut attempt = 0usize;
    let max_attempts = config.max_retries + 1;

    let result = RetryIf::spawn(
        config.delays(),
        || {
            attempt += 1;
            debug!(attempt, max_attempts, operation = operation_name, "Attempting operation");
            operation()
        },
        |err: &E| {
            let retry = err.is_retryable();
            if retry {
                warn!(
                    operation = operation_name,
                    reason = err.retry_reason(),
                    error = %err,
                    "Operation failed, retrying"
                );
            }
            retry
        },
    )
    .await;

    if let Err(ref err) = result {
        debug!(
            operation = operation_name,
            reason = err.retry_reason(),
            "Giving up on operation"
        );
    }
    result
}
