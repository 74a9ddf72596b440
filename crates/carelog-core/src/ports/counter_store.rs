//! Counter store port - windowed counters for rate limiting.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Post-increment state of one key's window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowCount {
    /// Number of requests recorded in the current window, including this one.
    pub count: u32,
    /// Instant the current window expires and the counter resets.
    pub reset_at: DateTime<Utc>,
}

/// Windowed counter abstraction over rate-limit backends.
///
/// A single-process deployment uses an in-memory map; multi-instance
/// deployments must share a store (e.g. Redis) or each instance silently
/// multiplies the effective quota.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the counter for `key`, starting a fresh window
    /// first when the previous one has expired. The read-modify-write must
    /// be serialized per key; concurrent callers may never observe the same
    /// count.
    async fn increment(&self, key: &str, window: Duration)
    -> Result<WindowCount, CounterStoreError>;
}

/// Counter store errors.
#[derive(Debug, thiserror::Error)]
pub enum CounterStoreError {
    #[error("Backend error: {0}")]
    Backend(String),
}
