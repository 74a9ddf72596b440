use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task entity - a planned activity ("taak" or "opdracht") a patient logs against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Free-form category, e.g. "taak" or "opdracht".
    pub task_type: String,
    /// Planned duration in minutes, if the patient set one.
    pub duration_minutes: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task with generated ID and timestamps.
    pub fn new(
        user_id: Uuid,
        title: String,
        task_type: String,
        duration_minutes: Option<f64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            task_type,
            duration_minutes,
            created_at: now,
            updated_at: now,
        }
    }
}
