use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub time_window: Duration,
    pub burst_allowance: u32,
}

impl RateLimitConfig {
    pub fn reddit_oauth() -> Self {
        Self {
            max_requests: 100, // Reddit allows 100 requests per minute for OAuth2
            time_window: Duration::from_secs(60),
            burst_allowance: 10,
        }
    }
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket pacing outgoing requests. Requests wait; they are never rejected.
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<BucketState>,
    capacity: f64,
    refill_rate: f64, // tokens per second
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let capacity = config.burst_allowance.max(1) as f64;
        let refill_rate = config.max_requests as f64 / config.time_window.as_secs_f64();

        Self {
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
            capacity,
            refill_rate,
        }
    }

    /// Waits until a token is available and consumes it. Returns the time spent waiting.
    pub async fn acquire(&self) -> Duration {
        let start = Instant::now();
        loop {
            match self.try_acquire().await {
                Ok(()) => return start.elapsed(),
                Err(wait_time) => {
                    tracing::debug!("Rate limit reached, waiting {:?}", wait_time);
                    sleep(wait_time).await;
                }
            }
        }
    }

    async fn try_acquire(&self) -> Result<(), Duration> {
        let mut state = self.state.lock().await;
        self.refill(&mut state);

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - state.tokens;
            Err(Duration::from_secs_f64(missing / self.refill_rate))
        }
    }

    pub async fn available_tokens(&self) -> u32 {
        let mut state = self.state.lock().await;
        self.refill(&mut state);
        state.tokens as u32
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill);
        state.tokens = (state.tokens + elapsed.as_secs_f64() * self.refill_rate).min(self.capacity);
        state.last_refill = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_burst_is_available_immediately() {
        let limiter = RateLimiter::new(RateLimitConfig::reddit_oauth());
        assert_eq!(limiter.available_tokens().await, 10);

        let waited = limiter.acquire().await;
        assert!(waited < Duration::from_millis(50));
        assert!(limiter.available_tokens().await < 10);
    }

    #[tokio::test]
    async fn test_waits_when_bucket_is_empty() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 600,
            time_window: Duration::from_secs(60),
            burst_allowance: 1,
        });

        limiter.acquire().await;
        let waited = limiter.acquire().await;
        assert!(waited >= Duration::from_millis(50));
    }
}
