//! # CareLog Infrastructure
//!
//! Concrete implementations of the ports defined in `carelog-core`.
//!
//! ## Feature Flags
//!
//! - `redis` (default) - Redis-backed counter store, required for
//!   multi-instance deployments where rate-limit quotas must be shared.

pub mod counter;
pub mod repository;

// Re-exports - In-Memory
pub use counter::InMemoryCounterStore;
pub use repository::{InMemoryReflectionRepository, InMemoryTaskLogRepository, InMemoryTaskRepository};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use counter::{RedisCounterConfig, RedisCounterStore};
