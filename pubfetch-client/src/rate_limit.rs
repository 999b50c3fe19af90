//! Token-bucket limiter shared by every E-utilities request
//!
//! NCBI allows 3 requests/s per IP without an API key and 10 requests/s with one;
//! exceeding that gets the caller temporarily blocked.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::error::{PubFetchError, Result};

pub const NCBI_RATE_WITHOUT_KEY: f64 = 3.0;
pub const NCBI_RATE_WITH_KEY: f64 = 10.0;

/// Cloneable handle; clones share one bucket
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<Mutex<TokenBucket>>,
}

struct TokenBucket {
    tokens: f64,
    capacity: f64,
    /// Tokens per second
    refill_rate: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }

    /// Take a token, or report how long until one is available
    fn try_take(&mut self) -> Option<Duration> {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            None
        } else {
            let missing = 1.0 - self.tokens;
            // Round up so float error cannot leave us just short of a token
            Some(Duration::from_secs_f64(missing / self.refill_rate) + Duration::from_millis(1))
        }
    }
}

impl RateLimiter {
    /// A limiter allowing `rate` requests per second, starting with a full bucket
    pub fn new(rate: f64) -> Self {
        let capacity = rate.max(1.0);
        Self {
            bucket: Arc::new(Mutex::new(TokenBucket {
                tokens: capacity,
                capacity,
                refill_rate: rate,
                last_refill: Instant::now(),
            })),
        }
    }

    pub fn ncbi_default() -> Self {
        Self::new(NCBI_RATE_WITHOUT_KEY)
    }

    pub fn ncbi_with_key() -> Self {
        Self::new(NCBI_RATE_WITH_KEY)
    }

    /// Wait until a request may be sent
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Result<()> {
        let wait = self.bucket.lock().await.try_take();
        let Some(wait) = wait else {
            return Ok(());
        };

        debug!(wait_ms = wait.as_millis(), "Waiting for rate limit token");
        sleep(wait).await;

        match self.bucket.lock().await.try_take() {
            None => Ok(()),
            Some(_) => {
                // Another task took the token that refilled while we slept
                warn!("No token available after waiting");
                Err(PubFetchError::RateLimitExceeded)
            }
        }
    }

    /// Whether a token is available right now; does not consume it
    pub async fn check_available(&self) -> bool {
        let mut bucket = self.bucket.lock().await;
        bucket.refill();
        bucket.tokens >= 1.0
    }

    pub async fn token_count(&self) -> f64 {
        let mut bucket = self.bucket.lock().await;
        bucket.refill();
        bucket.tokens
    }

    /// Requests per second
    pub async fn rate(&self) -> f64 {
        self.bucket.lock().await.refill_rate
    }
}
