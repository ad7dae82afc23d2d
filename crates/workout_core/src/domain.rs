//! crates/workout_core/src/domain.rs
//!
//! Defines the pure, core data structures for an active workout session.
//! These structs are independent of any database or transport. They derive
//! `Serialize`/`Deserialize` because the autosave snapshot is the full
//! `SessionState` serialized verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default exertion rating for a freshly created set.
pub const DEFAULT_EFFORT: u8 = 7;

/// One attempt within an exercise.
///
/// `weight` and `reps` hold free-form numeric text exactly as the user typed
/// it; they are parsed defensively whenever a number is needed (see
/// [`crate::session::parse_metric`]). An incomplete set never contributes to
/// volume, rep, or PR calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    /// 1-based ordinal, unique within the exercise, contiguous after
    /// renumbering.
    pub set_number: u32,
    pub weight: String,
    pub reps: String,
    /// Subjective exertion rating, 1-10.
    pub effort: u8,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SetRecord {
    pub fn empty(set_number: u32) -> Self {
        Self {
            set_number,
            weight: String::new(),
            reps: String::new(),
            effort: DEFAULT_EFFORT,
            completed: false,
            completed_at: None,
        }
    }
}

/// Catalog-supplied identity of an exercise. Immutable for the lifetime of
/// an entry except through a swap, which replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseIdentity {
    pub id: Uuid,
    pub name: String,
    pub muscle_group: String,
}

/// A prior best set supplied by the historical-performance source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSet {
    pub weight: f64,
    pub reps: u32,
}

/// One exercise within the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub identity: ExerciseIdentity,
    /// Planning targets; these do not change as sets complete.
    pub target_sets: u32,
    pub target_reps: u32,
    pub rest_seconds: u64,
    /// Insertion order is display order.
    pub sets: Vec<SetRecord>,
    pub notes: String,
    /// Prior best sets for PR comparison; empty when no history exists.
    pub historical_best: Vec<HistoricalSet>,
}

/// The rest-countdown timer, governed independently of the elapsed timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestTimer {
    pub active: bool,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub default_seconds: u64,
}

impl RestTimer {
    pub fn idle(default_seconds: u64) -> Self {
        Self {
            active: false,
            total_seconds: 0,
            remaining_seconds: 0,
            default_seconds,
        }
    }
}

/// The aggregate root: exactly one live instance per active workout.
///
/// Mutated exclusively through the operations in [`crate::session`]; once
/// `is_completed` is true the state is immutable and every mutation is a
/// no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Generated once at creation, stable for the session's lifetime.
    pub session_id: Uuid,
    pub name: String,
    pub category: String,
    pub started_at: DateTime<Utc>,
    pub exercises: Vec<ExerciseEntry>,
    /// Monotonically non-decreasing while unpaused.
    pub elapsed_seconds: u64,
    /// Pointer for UI focus; has no effect on computed metrics.
    pub current_exercise_index: usize,
    pub is_paused: bool,
    pub is_completed: bool,
    pub rest_timer: RestTimer,
}

/// A planned workout used to construct a fresh session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub name: String,
    pub category: String,
    pub exercises: Vec<PlannedExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedExercise {
    pub identity: ExerciseIdentity,
    pub target_sets: u32,
    pub target_reps: u32,
    pub rest_seconds: u64,
}

/// The kind of personal record achieved, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrKind {
    Weight,
    Reps,
    Volume,
}

/// A best-ever result for one exercise, relative to supplied history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub exercise_name: String,
    pub kind: PrKind,
    pub previous: f64,
    pub achieved: f64,
}

/// The locally computed result of completing a workout, always returned to
/// the caller even when the remote write fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub session_id: Uuid,
    pub name: String,
    pub category: String,
    pub duration_minutes: u64,
    pub total_volume: f64,
    pub total_sets: u32,
    pub total_reps: u32,
    /// Count of exercises with at least one completed set.
    pub exercises_completed: u32,
    pub estimated_calories: u32,
    pub score: f64,
    pub grade: String,
    pub personal_records: Vec<PersonalRecord>,
    pub completed_at: DateTime<Utc>,
}

/// Per-exercise detail persisted alongside the summary. Only completed sets
/// are recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDetail {
    pub name: String,
    pub muscle_group: String,
    pub notes: String,
    pub sets: Vec<CompletedSet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletedSet {
    pub weight: f64,
    pub reps: u32,
    pub effort: u8,
}

/// The full record written to the remote workout repository on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub summary: WorkoutSummary,
    pub exercises: Vec<ExerciseDetail>,
}

/// Input to the scoring collaborator: one entry per exercise plus the
/// session-level figures the formula needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreInput {
    pub duration_minutes: u64,
    pub planned_exercise_count: u32,
    pub exercises: Vec<ExerciseEffort>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseEffort {
    pub completed_sets: u32,
    pub average_effort: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub score: f64,
    pub grade: String,
}
