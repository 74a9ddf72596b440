//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod counter_store;
mod repository;

pub use clock::{Clock, SystemClock};
pub use counter_store::{CounterStore, CounterStoreError, WindowCount};
pub use repository::{ReflectionRepository, TaskLogRepository, TaskRepository};
