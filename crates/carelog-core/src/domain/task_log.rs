use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

use super::validate_score;

/// Task log entity - one completed activity with its recorded health scores.
///
/// All scores are on a 0-20 scale and optional: `None` means the patient did
/// not record the metric, which is deliberately distinct from a recorded `0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskLog {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub pain_score: Option<f64>,
    pub fatigue_score: Option<f64>,
    pub energy_before: Option<f64>,
    pub energy_after: Option<f64>,
    /// Actual duration in minutes.
    pub duration_minutes: Option<f64>,
    pub note: Option<String>,
    /// Derived insight text, written after the log is persisted.
    pub annotation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskLog {
    /// Create a new task log with generated ID and timestamps.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        task_id: Uuid,
        user_id: Uuid,
        pain_score: Option<f64>,
        fatigue_score: Option<f64>,
        energy_before: Option<f64>,
        energy_after: Option<f64>,
        duration_minutes: Option<f64>,
        note: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            task_id,
            user_id,
            pain_score,
            fatigue_score,
            energy_before,
            energy_after,
            duration_minutes,
            note,
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
        if let Some(d) = self.duration_minutes
            && (!d.is_finite() || d < 0.0)
        {
            return Err(DomainError::Validation(
                "duur_minuten must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}
