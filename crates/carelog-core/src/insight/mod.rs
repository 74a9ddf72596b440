//! Rule-based insight annotator.
//!
//! Turns the health scores of a persisted log into one short, informational
//! Dutch annotation by walking a fixed list of threshold rules. The engine
//! is a total function: whatever the inputs look like, it returns a
//! non-empty string, because an annotation is enrichment and may never fail
//! the write that triggered it.

use serde_json::Value;

/// Annotation used when the inputs for an analysis could not be assembled
/// at all (e.g. the parent task disappeared between persist and annotate).
pub const ANNOTATION_DEGRADED: &str =
    "Log succesvol verwerkt. Inzichten konden niet worden gegenereerd.";

const ANNOTATION_INSUFFICIENT: &str = "Log verwerkt. Onvoldoende gegevens voor een analyse.";
const ANNOTATION_DEFAULT: &str = "Log succesvol verwerkt. Blijf je activiteiten monitoren.";
const FALLBACK_TITLE: &str = "deze activiteit";

/// Threshold configuration for the insight rules.
///
/// All scores are on the 0-20 scale used throughout the app. The defaults
/// match the annotations patients and specialists already see, so tune them
/// deliberately.
#[derive(Debug, Clone, Copy)]
pub struct InsightThresholds {
    /// Pain score above which a caution is added.
    pub severe_pain: f64,
    /// Fatigue score above which a caution is added.
    pub severe_fatigue: f64,
    /// Energy drop (before minus after) that warrants reducing intensity.
    pub heavy_energy_drop: f64,
    /// Energy drop that is worth keeping an eye on.
    pub moderate_energy_drop: f64,
    /// Duration in minutes beyond which splitting the task is suggested.
    pub long_duration_minutes: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            severe_pain: 15.0,
            severe_fatigue: 15.0,
            heavy_energy_drop: 8.0,
            moderate_energy_drop: 5.0,
            long_duration_minutes: 30.0,
        }
    }
}

/// Health scores of one log, as far as they were recorded.
///
/// `None` means "not recorded", which is deliberately distinct from a
/// recorded `0`: rules only fire on metrics that are actually present, so a
/// patient who skipped the pain slider never gets a "no pain" reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LogMetrics {
    pub pain_score: Option<f64>,
    pub fatigue_score: Option<f64>,
    pub energy_before: Option<f64>,
    pub energy_after: Option<f64>,
    pub duration_minutes: Option<f64>,
}

impl LogMetrics {
    /// Lenient extraction from raw JSON: non-numeric or non-finite values
    /// degrade to "not recorded" instead of failing.
    pub fn from_json(value: &Value) -> Self {
        Self {
            pain_score: numeric_field(value, "pijn_score"),
            fatigue_score: numeric_field(value, "vermoeidheid_score"),
            energy_before: numeric_field(value, "energie_voor"),
            energy_after: numeric_field(value, "energie_na"),
            duration_minutes: numeric_field(value, "duur_minuten"),
        }
    }
}

fn numeric_field(value: &Value, key: &str) -> Option<f64> {
    value.get(key)?.as_f64().filter(|v| v.is_finite())
}

impl From<&crate::domain::TaskLog> for LogMetrics {
    fn from(log: &crate::domain::TaskLog) -> Self {
        Self {
            pain_score: log.pain_score,
            fatigue_score: log.fatigue_score,
            energy_before: log.energy_before,
            energy_after: log.energy_after,
            duration_minutes: log.duration_minutes,
        }
    }
}

impl From<&crate::domain::Reflection> for LogMetrics {
    fn from(reflection: &crate::domain::Reflection) -> Self {
        Self {
            pain_score: reflection.pain_score,
            fatigue_score: reflection.fatigue_score,
            energy_before: reflection.energy_before,
            energy_after: reflection.energy_after,
            duration_minutes: None,
        }
    }
}

/// Task context the annotation may reference.
#[derive(Debug, Clone, Default)]
pub struct TaskContext {
    pub title: Option<String>,
    pub task_type: Option<String>,
}

impl From<&crate::domain::Task> for TaskContext {
    fn from(task: &crate::domain::Task) -> Self {
        Self {
            title: Some(task.title.clone()),
            task_type: Some(task.task_type.clone()),
        }
    }
}

/// The insight engine itself. Stateless apart from its thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Annotator {
    thresholds: InsightThresholds,
}

impl Annotator {
    pub fn new(thresholds: InsightThresholds) -> Self {
        Self { thresholds }
    }

    /// Derive the annotation for one log.
    ///
    /// Rules are evaluated in a fixed order and their fragments accumulate,
    /// so the same inputs always produce the same sentence sequence.
    pub fn annotate(&self, log: Option<&LogMetrics>, task: Option<&TaskContext>) -> String {
        let (Some(log), Some(task)) = (log, task) else {
            return ANNOTATION_INSUFFICIENT.to_string();
        };

        tracing::debug!(?log, title = ?task.title, "evaluating insight rules");

        let t = &self.thresholds;
        let mut fragments: Vec<String> = Vec::new();

        let title = task.title.as_deref().unwrap_or(FALLBACK_TITLE);
        let severe_pain = log.pain_score.is_some_and(|p| p > t.severe_pain);
        let severe_fatigue = log.fatigue_score.is_some_and(|f| f > t.severe_fatigue);

        match (severe_pain, severe_fatigue) {
            (true, true) => fragments.push(format!(
                "Let op: zowel de pijn als de vermoeidheid waren hoog tijdens '{title}'. \
                 Overweeg deze activiteit met je specialist te bespreken."
            )),
            (true, false) => fragments.push(format!(
                "Let op: de pijnscore was hoog tijdens '{title}'. Neem voldoende rust."
            )),
            (false, true) => fragments.push(format!(
                "Let op: de vermoeidheid was hoog tijdens '{title}'. Plan hersteltijd in."
            )),
            (false, false) => {}
        }

        let energy_drop = match (log.energy_before, log.energy_after) {
            (Some(before), Some(after)) => Some(before - after),
            _ => None,
        };

        if let Some(drop) = energy_drop {
            if drop > t.heavy_energy_drop {
                fragments.push(
                    "Deze activiteit kost veel energie. Overweeg de duur of intensiteit te \
                     verminderen."
                        .to_string(),
                );
            } else if drop > t.moderate_energy_drop {
                fragments.push(
                    "Deze activiteit kost behoorlijk wat energie. Houd dit in de gaten."
                        .to_string(),
                );
            }
        }

        let long_and_draining = log
            .duration_minutes
            .is_some_and(|d| d > t.long_duration_minutes)
            && energy_drop.is_some_and(|drop| drop > t.moderate_energy_drop);
        if long_and_draining {
            fragments
                .push("Tip: verdeel de taak over meerdere kortere sessies.".to_string());
        }

        if fragments.is_empty() {
            return ANNOTATION_DEFAULT.to_string();
        }

        fragments.join(" ")
    }
}
