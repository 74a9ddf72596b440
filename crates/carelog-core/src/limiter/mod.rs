//! Fixed-window rate limiter.
//!
//! Admits or rejects a named operation+subject pair under a quota per time
//! window. The window is *fixed*, not sliding: a burst straddling a window
//! boundary can reach up to `2 * max_requests`. That imprecision is accepted
//! for abuse prevention on low-stakes write endpoints; the counter backend
//! is injectable (see [`CounterStore`]) so the same limiter works against an
//! in-memory map or a shared Redis counter.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::ports::{Clock, CounterStore, CounterStoreError, SystemClock};

/// Quota for one operation: `max_requests` per `window`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl RateLimitConfig {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
        }
    }

    /// Shorthand for the common requests-per-minute quota.
    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(Duration::from_secs(60), max_requests)
    }

    fn validate(&self) -> Result<(), RateLimitError> {
        if self.window.is_zero() {
            return Err(RateLimitError::InvalidConfig(
                "window must be positive".to_string(),
            ));
        }
        if self.max_requests == 0 {
            return Err(RateLimitError::InvalidConfig(
                "max_requests must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a rate limit check. Quota exhaustion is data, not an error.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Configured quota, echoed for the `X-RateLimit-Limit` header.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Instant the current window resets.
    pub reset_at: DateTime<Utc>,
    /// Whole seconds until retry is worthwhile; only set on rejection.
    pub retry_after: Option<Duration>,
}

/// Rate limiter errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Programmer error: empty key or non-positive quota. Raised at call
    /// time so misconfiguration surfaces in tests, never as a silent
    /// default.
    #[error("Invalid rate limit configuration: {0}")]
    InvalidConfig(String),

    #[error("Counter store error: {0}")]
    Store(#[from] CounterStoreError),
}

/// Fixed-window limiter over an injected counter store.
pub struct FixedWindowLimiter {
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
}

impl FixedWindowLimiter {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn CounterStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Check whether one more request under `key` fits the quota.
    ///
    /// Increments the window counter through the store and decides from the
    /// post-increment count, so concurrent requests for the same key never
    /// lose updates. Rejected requests still count toward the window, which
    /// keeps a client hammering a full window locked out until reset.
    pub async fn check(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitDecision, RateLimitError> {
        if key.is_empty() {
            return Err(RateLimitError::InvalidConfig(
                "key must not be empty".to_string(),
            ));
        }
        config.validate()?;

        let window = self.store.increment(key, config.window).await?;

        if window.count <= config.max_requests {
            Ok(RateLimitDecision {
                allowed: true,
                limit: config.max_requests,
                remaining: config.max_requests - window.count,
                reset_at: window.reset_at,
                retry_after: None,
            })
        } else {
            let millis_left = (window.reset_at - self.clock.now()).num_milliseconds().max(0);
            let retry_after = Duration::from_secs((millis_left as u64).div_ceil(1000));
            tracing::debug!(key, count = window.count, "rate limit exceeded");
            Ok(RateLimitDecision {
                allowed: false,
                limit: config.max_requests,
                remaining: 0,
                reset_at: window.reset_at,
                retry_after: Some(retry_after),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::WindowCount;
    use async_trait::async_trait;
    use chrono::TimeDelta;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Manually advanced clock shared between the test and the store.
    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Utc::now())))
        }

        fn advance(&self, delta: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += TimeDelta::from_std(delta).unwrap();
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    /// Minimal fixed-window store, driven by the same manual clock.
    struct FakeStore {
        clock: Arc<ManualClock>,
        windows: Mutex<HashMap<String, WindowCount>>,
    }

    impl FakeStore {
        fn new(clock: Arc<ManualClock>) -> Self {
            Self {
                clock,
                windows: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl CounterStore for FakeStore {
        async fn increment(
            &self,
            key: &str,
            window: Duration,
        ) -> Result<WindowCount, CounterStoreError> {
            let now = self.clock.now();
            let mut windows = self.windows.lock().unwrap();
            let entry = windows
                .entry(key.to_string())
                .and_modify(|w| {
                    if now >= w.reset_at {
                        w.count = 0;
                        w.reset_at = now + window;
                    }
                    w.count += 1;
                })
                .or_insert(WindowCount {
                    count: 1,
                    reset_at: now + window,
                });
            Ok(*entry)
        }
    }

    fn limiter(clock: &Arc<ManualClock>) -> FixedWindowLimiter {
        FixedWindowLimiter::with_clock(Arc::new(FakeStore::new(clock.clone())), clock.clone())
    }

    #[tokio::test]
    async fn admits_until_quota_then_rejects() {
        let clock = ManualClock::new();
        let limiter = limiter(&clock);
        let config = RateLimitConfig::per_minute(3);

        for expected_remaining in [2, 1, 0] {
            let decision = limiter.check("create_log_u1", &config).await.unwrap();
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
            assert_eq!(decision.limit, 3);
        }

        let decision = limiter.check("create_log_u1", &config).await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        let retry = decision.retry_after.expect("retry_after set on rejection");
        assert!(retry.as_secs() >= 1 && retry.as_secs() <= 60);
    }

    #[tokio::test]
    async fn window_rollover_readmits() {
        let clock = ManualClock::new();
        let limiter = limiter(&clock);
        let config = RateLimitConfig::per_minute(1);

        assert!(limiter.check("k", &config).await.unwrap().allowed);
        assert!(!limiter.check("k", &config).await.unwrap().allowed);

        clock.advance(Duration::from_secs(61));

        let decision = limiter.check("k", &config).await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[tokio::test]
    async fn keys_are_isolated() {
        let clock = ManualClock::new();
        let limiter = limiter(&clock);
        let config = RateLimitConfig::per_minute(1);

        assert!(limiter.check("create_log_a", &config).await.unwrap().allowed);
        assert!(!limiter.check("create_log_a", &config).await.unwrap().allowed);

        // A's exhausted window never touches B.
        assert!(limiter.check("create_log_b", &config).await.unwrap().allowed);
    }

    #[tokio::test]
    async fn invalid_config_fails_fast() {
        let clock = ManualClock::new();
        let limiter = limiter(&clock);

        let zero_window = RateLimitConfig::new(Duration::ZERO, 5);
        assert!(matches!(
            limiter.check("k", &zero_window).await,
            Err(RateLimitError::InvalidConfig(_))
        ));

        let zero_quota = RateLimitConfig::per_minute(0);
        assert!(matches!(
            limiter.check("k", &zero_quota).await,
            Err(RateLimitError::InvalidConfig(_))
        ));

        let config = RateLimitConfig::per_minute(5);
        assert!(matches!(
            limiter.check("", &config).await,
            Err(RateLimitError::InvalidConfig(_))
        ));
    }
}
