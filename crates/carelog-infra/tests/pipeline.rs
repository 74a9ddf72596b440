//! End-to-end test of the write pipeline: rate limit check, persist,
//! annotate, write the annotation back.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use carelog_core::domain::{Task, TaskLog};
use carelog_core::insight::{Annotator, LogMetrics, TaskContext};
use carelog_core::limiter::{FixedWindowLimiter, RateLimitConfig};
use carelog_core::ports::{TaskLogRepository, TaskRepository};
use carelog_infra::{InMemoryCounterStore, InMemoryTaskLogRepository, InMemoryTaskRepository};

#[tokio::test]
async fn admitted_write_is_persisted_and_annotated() {
    let limiter = FixedWindowLimiter::new(Arc::new(InMemoryCounterStore::new()));
    let tasks = InMemoryTaskRepository::new();
    let logs = InMemoryTaskLogRepository::new();
    let annotator = Annotator::default();

    let user_id = Uuid::new_v4();
    let task = tasks
        .save(Task::new(
            user_id,
            "Wandelen".to_string(),
            "taak".to_string(),
            Some(30.0),
        ))
        .await
        .unwrap();

    let quota = RateLimitConfig::per_minute(10);
    let decision = limiter
        .check(&format!("create_task_log_{user_id}"), &quota)
        .await
        .unwrap();
    assert!(decision.allowed);

    let log = TaskLog::new(
        task.id,
        user_id,
        Some(18.0),
        Some(18.0),
        Some(20.0),
        Some(5.0),
        Some(45.0),
        None,
    );
    log.validate().unwrap();
    let saved = logs.save(log).await.unwrap();

    let annotation = annotator.annotate(
        Some(&LogMetrics::from(&saved)),
        Some(&TaskContext::from(&task)),
    );
    logs.set_annotation(saved.id, &annotation).await.unwrap();

    let stored = logs.find_by_id(saved.id).await.unwrap().unwrap();
    let text = stored.annotation.expect("annotation stored");
    assert!(text.contains("Wandelen"));
    assert!(text.contains("kost veel energie"));
    assert!(text.contains("kortere sessies"));
}

#[tokio::test]
async fn exhausted_quota_rejects_with_retry_hint() {
    let limiter = FixedWindowLimiter::new(Arc::new(InMemoryCounterStore::new()));
    let quota = RateLimitConfig::new(Duration::from_secs(60), 2);
    let key = format!("create_task_log_{}", Uuid::new_v4());

    assert!(limiter.check(&key, &quota).await.unwrap().allowed);
    assert!(limiter.check(&key, &quota).await.unwrap().allowed);

    let rejected = limiter.check(&key, &quota).await.unwrap();
    assert!(!rejected.allowed);
    assert_eq!(rejected.remaining, 0);
    assert_eq!(rejected.limit, 2);

    let retry = rejected.retry_after.expect("retry hint on rejection");
    assert!(retry.as_secs() >= 1 && retry.as_secs() <= 60);

    // A different user is unaffected.
    let other = format!("create_task_log_{}", Uuid::new_v4());
    assert!(limiter.check(&other, &quota).await.unwrap().allowed);
}

#[tokio::test]
async fn annotation_never_blocks_the_write() {
    // Parent task cannot be resolved: the log is still persisted and gets
    // the minimal annotation.
    let logs = InMemoryTaskLogRepository::new();
    let annotator = Annotator::default();

    let log = TaskLog::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Some(18.0),
        None,
        None,
        None,
        None,
        None,
    );
    let saved = logs.save(log).await.unwrap();

    let annotation = annotator.annotate(Some(&LogMetrics::from(&saved)), None);
    assert!(!annotation.is_empty());
    logs.set_annotation(saved.id, &annotation).await.unwrap();

    let stored = logs.find_by_id(saved.id).await.unwrap().unwrap();
    assert!(stored.annotation.is_some());
}
