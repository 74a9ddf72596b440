//! Redis counter store - shared fixed-window counters across instances.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use redis::aio::ConnectionManager;
use redis::{Client, Script};

use carelog_core::ports::{CounterStore, CounterStoreError, WindowCount};

/// Redis counter store configuration.
#[derive(Debug, Clone)]
pub struct RedisCounterConfig {
    /// Redis connection URL.
    pub url: String,
    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,
    /// Key prefix for rate limit keys.
    pub key_prefix: String,
}

impl Default for RedisCounterConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            key_prefix: "ratelimit".to_string(),
        }
    }
}

impl RedisCounterConfig {
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            key_prefix: std::env::var("RATE_LIMIT_KEY_PREFIX")
                .unwrap_or_else(|_| "ratelimit".to_string()),
        }
    }
}

/// Redis-backed counter store.
///
/// A Lua script makes increment-and-fetch atomic server-side, so every
/// instance sharing the store contributes to the same window counter.
pub struct RedisCounterStore {
    conn: ConnectionManager,
    config: RedisCounterConfig,
    script: Script,
}

impl RedisCounterStore {
    pub async fn new(config: RedisCounterConfig) -> Result<Self, CounterStoreError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| CounterStoreError::Backend(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn_manager_fut = ConnectionManager::new(client);
        let conn = tokio::time::timeout(config.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| CounterStoreError::Backend("Connection timed out".to_string()))?
            .map_err(|e| CounterStoreError::Backend(e.to_string()))?;

        // Lua script for atomic increment with TTL.
        // Returns: [current_count, ttl_remaining_ms]
        let script = Script::new(
            r#"
            local key = KEYS[1]
            local window_ms = tonumber(ARGV[1])

            local current = redis.call('INCR', key)
            if current == 1 then
                redis.call('PEXPIRE', key, window_ms)
            end

            local ttl = redis.call('PTTL', key)
            return {current, ttl}
            "#,
        );

        tracing::info!(url = %config.url, "Connected to Redis counter store");

        Ok(Self {
            conn,
            config,
            script,
        })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, CounterStoreError> {
        Self::new(RedisCounterConfig::from_env()).await
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}:{}", self.config.key_prefix, key)
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(
        &self,
        key: &str,
        window: Duration,
    ) -> Result<WindowCount, CounterStoreError> {
        let redis_key = self.make_key(key);
        let mut conn = self.conn.clone();

        let result: Vec<i64> = self
            .script
            .key(&redis_key)
            .arg(window.as_millis() as u64)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| CounterStoreError::Backend(e.to_string()))?;

        let count = result.first().copied().unwrap_or(1).max(1) as u32;
        let ttl_ms = result
            .get(1)
            .copied()
            .filter(|ttl| *ttl > 0)
            .unwrap_or(window.as_millis() as i64);

        Ok(WindowCount {
            count,
            reset_at: Utc::now() + TimeDelta::milliseconds(ttl_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get_test_store() -> Option<RedisCounterStore> {
        let config = RedisCounterConfig {
            url: std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
            key_prefix: "test_ratelimit".to_string(),
        };

        RedisCounterStore::new(config).await.ok()
    }

    #[tokio::test]
    async fn test_redis_counter_window() {
        let store = match get_test_store().await {
            Some(s) => s,
            None => return,
        };

        let key = format!("user_{}", uuid::Uuid::new_v4());
        let window = Duration::from_secs(1);

        let first = store.increment(&key, window).await.unwrap();
        assert_eq!(first.count, 1);

        let second = store.increment(&key, window).await.unwrap();
        assert_eq!(second.count, 2);

        // Wait for reset
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let after = store.increment(&key, window).await.unwrap();
        assert_eq!(after.count, 1);
    }
}
