use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Reflection, Task, TaskLog};
use crate::error::RepoError;

/// Task repository.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, RepoError>;

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Task>, RepoError>;

    async fn save(&self, task: Task) -> Result<Task, RepoError>;
}

/// Task log repository.
#[async_trait]
pub trait TaskLogRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TaskLog>, RepoError>;

    async fn find_by_task_id(&self, task_id: Uuid) -> Result<Vec<TaskLog>, RepoError>;

    /// Save a log (create or update).
    async fn save(&self, log: TaskLog) -> Result<TaskLog, RepoError>;

    /// Write the derived annotation back onto a persisted log.
    async fn set_annotation(&self, id: Uuid, annotation: &str) -> Result<(), RepoError>;
}

/// Reflection repository.
#[async_trait]
pub trait ReflectionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reflection>, RepoError>;

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Reflection>, RepoError>;

    async fn save(&self, reflection: Reflection) -> Result<Reflection, RepoError>;

    /// Write the derived annotation back onto a persisted reflection.
    async fn set_annotation(&self, id: Uuid, annotation: &str) -> Result<(), RepoError>;
}
