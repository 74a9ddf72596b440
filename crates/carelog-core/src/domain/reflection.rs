use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

use super::validate_score;

/// Reflection entity - a free-text check-in, optionally tied to a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reflection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task_id: Option<Uuid>,
    pub body: String,
    pub pain_score: Option<f64>,
    pub fatigue_score: Option<f64>,
    pub energy_before: Option<f64>,
    pub energy_after: Option<f64>,
    /// Derived insight text, written after the reflection is persisted.
    pub annotation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reflection {
    /// Create a new reflection with generated ID and timestamps.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        task_id: Option<Uuid>,
        body: String,
        pain_score: Option<f64>,
        fatigue_score: Option<f64>,
        energy_before: Option<f64>,
        energy_after: Option<f64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            task_id,
            body,
            pain_score,
            fatigue_score,
            energy_before,
            energy_after,
            annotation: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate all recorded scores against the 0-20 scale.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_score("pijn_score", self.pain_score)?;
        validate_score("vermoeidheid_score", self.fatigue_score)?;
        validate_score("energie_voor", self.energy_before)?;
        validate_score("energie_na", self.energy_after)?;
        if self.body.trim().is_empty() {
            return Err(DomainError::Validation(
                "reflectie body must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
