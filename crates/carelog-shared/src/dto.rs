//! Data Transfer Objects - request/response types for the API.
//!
//! Wire keys are the Dutch field names the existing clients already send
//! (`pijn_score`, `energie_voor`, ...). Metric fields deserialize leniently:
//! a malformed value degrades to "not recorded" instead of rejecting the
//! whole write, because annotation is enrichment and the write must succeed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Accept any JSON value for a score; only finite numbers survive.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|v| v.is_finite()))
}

/// Request to create a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub titel: String,
    #[serde(default = "default_task_type")]
    pub taak_type: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duur_minuten: Option<f64>,
}

fn default_task_type() -> String {
    "taak".to_string()
}

/// Response containing a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub titel: String,
    pub taak_type: String,
    pub duur_minuten: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a task log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskLogRequest {
    pub taak_id: Uuid,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pijn_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub vermoeidheid_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub energie_voor: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub energie_na: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duur_minuten: Option<f64>,
    #[serde(default)]
    pub notitie: Option<String>,
}

/// Request to update an existing task log. Only provided fields change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskLogRequest {
    #[serde(default, deserialize_with = "lenient_number")]
    pub pijn_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub vermoeidheid_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub energie_voor: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub energie_na: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duur_minuten: Option<f64>,
    #[serde(default)]
    pub notitie: Option<String>,
}

/// Response containing a task log, including its derived annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskLogResponse {
    pub id: Uuid,
    pub taak_id: Uuid,
    pub pijn_score: Option<f64>,
    pub vermoeidheid_score: Option<f64>,
    pub energie_voor: Option<f64>,
    pub energie_na: Option<f64>,
    pub duur_minuten: Option<f64>,
    pub notitie: Option<String>,
    pub annotatie: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a reflection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReflectionRequest {
    #[serde(default)]
    pub taak_id: Option<Uuid>,
    pub tekst: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pijn_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub vermoeidheid_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub energie_voor: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub energie_na: Option<f64>,
}

/// Request to update an existing reflection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReflectionRequest {
    #[serde(default)]
    pub tekst: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub pijn_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub vermoeidheid_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub energie_voor: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub energie_na: Option<f64>,
}

/// Response containing a reflection, including its derived annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionResponse {
    pub id: Uuid,
    pub taak_id: Option<Uuid>,
    pub tekst: String,
    pub pijn_score: Option<f64>,
    pub vermoeidheid_score: Option<f64>,
    pub energie_voor: Option<f64>,
    pub energie_na: Option<f64>,
    pub annotatie: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_score_degrades_to_absent() {
        let raw = r#"{
            "taak_id": "7f8d2f50-52f2-4b0e-9c7e-0f6f0a1d2b3c",
            "pijn_score": "not-a-number",
            "vermoeidheid_score": 12
        }"#;
        let req: CreateTaskLogRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.pijn_score, None);
        assert_eq!(req.vermoeidheid_score, Some(12.0));
    }

    #[test]
    fn missing_scores_are_absent_not_zero() {
        let raw = r#"{ "taak_id": "7f8d2f50-52f2-4b0e-9c7e-0f6f0a1d2b3c" }"#;
        let req: CreateTaskLogRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.pijn_score, None);
        assert_eq!(req.energie_voor, None);
    }
}
