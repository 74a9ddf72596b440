//! Domain entities - the core business objects.

mod reflection;
mod task;
mod task_log;

pub use reflection::Reflection;
pub use task::Task;
pub use task_log::TaskLog;

use crate::error::DomainError;

/// Upper bound for all recorded health scores (pain, fatigue, energy).
pub const MAX_SCORE: f64 = 20.0;

/// Validate an optional 0-20 score. Absent values are valid; a recorded
/// value outside the scale is a validation failure, not something to clamp.
pub fn validate_score(name: &str, value: Option<f64>) -> Result<(), DomainError> {
    match value {
        Some(v) if !v.is_finite() || !(0.0..=MAX_SCORE).contains(&v) => Err(
            DomainError::Validation(format!("{name} must be between 0 and {MAX_SCORE}")),
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_score_is_valid() {
        assert!(validate_score("pijn_score", None).is_ok());
    }

    #[test]
    fn in_range_score_is_valid() {
        assert!(validate_score("pijn_score", Some(0.0)).is_ok());
        assert!(validate_score("pijn_score", Some(20.0)).is_ok());
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        assert!(validate_score("pijn_score", Some(21.0)).is_err());
        assert!(validate_score("pijn_score", Some(-1.0)).is_err());
        assert!(validate_score("pijn_score", Some(f64::NAN)).is_err());
    }
}
