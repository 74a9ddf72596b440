//! Application state - shared across all handlers.

use std::sync::Arc;

use carelog_core::insight::Annotator;
use carelog_core::limiter::FixedWindowLimiter;
use carelog_core::ports::{CounterStore, ReflectionRepository, TaskLogRepository, TaskRepository};
use carelog_infra::{
    InMemoryCounterStore, InMemoryReflectionRepository, InMemoryTaskLogRepository,
    InMemoryTaskRepository,
};

use crate::config::{AppConfig, Quotas};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskRepository>,
    pub task_logs: Arc<dyn TaskLogRepository>,
    pub reflections: Arc<dyn ReflectionRepository>,
    pub limiter: Arc<FixedWindowLimiter>,
    pub annotator: Annotator,
    pub quotas: Quotas,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "redis")]
        {
            use carelog_infra::{RedisCounterConfig, RedisCounterStore};

            if config.redis_url.is_some() {
                match RedisCounterStore::new(RedisCounterConfig::from_env()).await {
                    Ok(store) => {
                        return Self::with_counter_store(Arc::new(store), config.quotas);
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to Redis counter store: {}. \
                             Falling back to per-process counters.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!(
                    "REDIS_URL not set. Rate limits are per-process; quotas multiply \
                     across instances."
                );
            }
        }

        #[cfg(not(feature = "redis"))]
        tracing::info!("Running without redis feature - using per-process counters");

        // In-memory fallback with a periodic sweep so stale windows do not
        // accumulate over the life of the process.
        let store = Arc::new(InMemoryCounterStore::new());
        let sweeper = store.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
            loop {
                interval.tick().await;
                sweeper.sweep().await;
            }
        });

        Self::with_counter_store(store, config.quotas)
    }

    /// Fully in-memory state for the handler tests.
    #[cfg(test)]
    pub fn in_memory(quotas: Quotas) -> Self {
        Self::with_counter_store(Arc::new(InMemoryCounterStore::new()), quotas)
    }

    fn with_counter_store(store: Arc<dyn CounterStore>, quotas: Quotas) -> Self {
        Self {
            tasks: Arc::new(InMemoryTaskRepository::new()),
            task_logs: Arc::new(InMemoryTaskLogRepository::new()),
            reflections: Arc::new(InMemoryReflectionRepository::new()),
            limiter: Arc::new(FixedWindowLimiter::new(store)),
            annotator: Annotator::default(),
            quotas,
        }
    }
}
