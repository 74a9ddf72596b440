//! Repository implementations.
//!
//! The hosted database is an external collaborator behind the repository
//! ports; in-process the API runs against these in-memory implementations.

mod memory;

pub use memory::{InMemoryReflectionRepository, InMemoryTaskLogRepository, InMemoryTaskRepository};
