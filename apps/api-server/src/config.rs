//! Application configuration loaded from environment variables.

use std::env;

use carelog_core::limiter::RateLimitConfig;

/// Per-endpoint quotas. Write endpoints get a tighter budget than reads.
#[derive(Debug, Clone, Copy)]
pub struct Quotas {
    pub write: RateLimitConfig,
    pub read: RateLimitConfig,
}

impl Default for Quotas {
    fn default() -> Self {
        Self {
            write: RateLimitConfig::per_minute(10),
            read: RateLimitConfig::per_minute(30),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// When set, rate-limit counters are shared through Redis.
    pub redis_url: Option<String>,
    pub quotas: Quotas,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Quotas::default();
        let quotas = Quotas {
            write: RateLimitConfig::per_minute(
                env::var("RATE_LIMIT_WRITE_PER_MIN")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.write.max_requests),
            ),
            read: RateLimitConfig::per_minute(
                env::var("RATE_LIMIT_READ_PER_MIN")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.read.max_requests),
            ),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            redis_url: env::var("REDIS_URL").ok(),
            quotas,
        }
    }
}
