//! In-memory counter store - used when no shared backend is configured.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use carelog_core::ports::{Clock, CounterStore, CounterStoreError, SystemClock, WindowCount};

struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// In-memory fixed-window counters behind a single async mutex.
///
/// The mutex serializes every read-modify-write, so concurrent requests for
/// the same key never observe the same count. Limits are per-process, not
/// distributed across instances; use the Redis store for that.
pub struct InMemoryCounterStore {
    windows: Mutex<HashMap<String, Window>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Drop expired windows to bound memory on long-lived processes.
    /// Active keys are untouched; an evicted key simply starts a fresh
    /// window on its next request.
    pub async fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now < w.reset_at);
        let removed = before - windows.len();
        if removed > 0 {
            tracing::debug!(removed, "swept expired rate limit windows");
        }
        removed
    }
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(
        &self,
        key: &str,
        window: Duration,
    ) -> Result<WindowCount, CounterStoreError> {
        let now = self.clock.now();
        let span = TimeDelta::from_std(window)
            .map_err(|e| CounterStoreError::Backend(format!("window out of range: {e}")))?;

        let mut windows = self.windows.lock().await;
        let entry = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            reset_at: now + span,
        });

        if now >= entry.reset_at {
            entry.count = 0;
            entry.reset_at = now + span;
        }
        entry.count += 1;

        Ok(WindowCount {
            count: entry.count,
            reset_at: entry.reset_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    struct ManualClock(StdMutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(StdMutex::new(Utc::now())))
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

    const WINDOW: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn counts_within_a_window() {
        let store = InMemoryCounterStore::new();

        let first = store.increment("k", WINDOW).await.unwrap();
        let second = store.increment("k", WINDOW).await.unwrap();

        assert_eq!(first.count, 1);
        assert_eq!(second.count, 2);
        // Reset instant is fixed at window creation.
        assert_eq!(first.reset_at, second.reset_at);
    }

    #[tokio::test]
    async fn expired_window_restarts() {
        let clock = ManualClock::new();
        let store = InMemoryCounterStore::with_clock(clock.clone());

        store.increment("k", WINDOW).await.unwrap();
        store.increment("k", WINDOW).await.unwrap();

        clock.advance(Duration::from_secs(61));

        let after = store.increment("k", WINDOW).await.unwrap();
        assert_eq!(after.count, 1);
    }

    #[tokio::test]
    async fn keys_do_not_share_windows() {
        let store = InMemoryCounterStore::new();

        store.increment("a", WINDOW).await.unwrap();
        store.increment("a", WINDOW).await.unwrap();
        let b = store.increment("b", WINDOW).await.unwrap();

        assert_eq!(b.count, 1);
    }

    #[tokio::test]
    async fn sweep_evicts_only_expired_windows() {
        let clock = ManualClock::new();
        let store = InMemoryCounterStore::with_clock(clock.clone());

        store.increment("old", WINDOW).await.unwrap();
        clock.advance(Duration::from_secs(61));
        store.increment("fresh", WINDOW).await.unwrap();

        assert_eq!(store.sweep().await, 1);

        // The surviving key keeps its count.
        let fresh = store.increment("fresh", WINDOW).await.unwrap();
        assert_eq!(fresh.count, 2);
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let store = Arc::new(InMemoryCounterStore::new());

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.increment("shared", WINDOW).await.unwrap()
            }));
        }

        let mut counts: Vec<u32> = Vec::new();
        for handle in handles {
            counts.push(handle.await.unwrap().count);
        }
        counts.sort_unstable();

        // Every increment observed a distinct count.
        assert_eq!(counts, (1..=20).collect::<Vec<u32>>());
    }
}
