//! In-memory repositories using a simple HashMap with async RwLock.
//!
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use carelog_core::domain::{Reflection, Task, TaskLog};
use carelog_core::error::RepoError;
use carelog_core::ports::{ReflectionRepository, TaskLogRepository, TaskRepository};

/// In-memory task repository.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    store: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Task>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save(&self, mut task: Task) -> Result<Task, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&task.id) {
            task.updated_at = Utc::now();
        }
        store.insert(task.id, task.clone());
        Ok(task)
    }
}

/// In-memory task log repository.
#[derive(Default)]
pub struct InMemoryTaskLogRepository {
    store: RwLock<HashMap<Uuid, TaskLog>>,
}

impl InMemoryTaskLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskLogRepository for InMemoryTaskLogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TaskLog>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn find_by_task_id(&self, task_id: Uuid) -> Result<Vec<TaskLog>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|l| l.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn save(&self, mut log: TaskLog) -> Result<TaskLog, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&log.id) {
            log.updated_at = Utc::now();
        }
        store.insert(log.id, log.clone());
        Ok(log)
    }

    async fn set_annotation(&self, id: Uuid, annotation: &str) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let log = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        log.annotation = Some(annotation.to_string());
        log.updated_at = Utc::now();
        Ok(())
    }
}

/// In-memory reflection repository.
#[derive(Default)]
pub struct InMemoryReflectionRepository {
    store: RwLock<HashMap<Uuid, Reflection>>,
}

impl InMemoryReflectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReflectionRepository for InMemoryReflectionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reflection>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Reflection>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save(&self, mut reflection: Reflection) -> Result<Reflection, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&reflection.id) {
            reflection.updated_at = Utc::now();
        }
        store.insert(reflection.id, reflection.clone());
        Ok(reflection)
    }

    async fn set_annotation(&self, id: Uuid, annotation: &str) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let reflection = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        reflection.annotation = Some(annotation.to_string());
        reflection.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_find_log() {
        let repo = InMemoryTaskLogRepository::new();
        let log = TaskLog::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Some(3.0),
            None,
            None,
            None,
            None,
            None,
        );

        let saved = repo.save(log.clone()).await.unwrap();
        let found = repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(found.pain_score, Some(3.0));
    }

    #[tokio::test]
    async fn test_set_annotation() {
        let repo = InMemoryTaskLogRepository::new();
        let log = TaskLog::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            None,
            None,
            None,
            None,
            None,
        );
        let saved = repo.save(log).await.unwrap();

        repo.set_annotation(saved.id, "Log succesvol verwerkt.")
            .await
            .unwrap();

        let found = repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(found.annotation.as_deref(), Some("Log succesvol verwerkt."));
    }

    #[tokio::test]
    async fn test_set_annotation_missing_log() {
        let repo = InMemoryTaskLogRepository::new();
        let err = repo.set_annotation(Uuid::new_v4(), "x").await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }
}
