//! crates/workout_core/src/summary.rs
//!
//! Summary metrics computed at completion: totals, calorie estimation via a
//! fixed MET lookup, and assembly of the record persisted to the remote
//! repository.

use chrono::Utc;

use crate::domain::{
    CompletedSet, ExerciseDetail, ExerciseEffort, PersonalRecord, Score, ScoreInput,
    SessionState, WorkoutRecord, WorkoutSummary,
};
use crate::session::parse_metric;

/// MET applied when the category is not in the lookup table.
const DEFAULT_MET: f64 = 5.0;

/// Fixed Metabolic-Equivalent-of-Task multipliers per workout category,
/// case-insensitive.
pub fn met_for_category(category: &str) -> f64 {
    match category.to_ascii_lowercase().as_str() {
        "strength" | "powerlifting" => 6.0,
        "cardio" | "hiit" | "crossfit" => 8.0,
        "mobility" | "yoga" => 3.0,
        _ => DEFAULT_MET,
    }
}

impl ScoreInput {
    /// Gathers the per-exercise figures the scoring collaborator is fed:
    /// completed-set counts and average effort over completed sets.
    pub fn from_state(state: &SessionState) -> Self {
        let exercises = state
            .exercises
            .iter()
            .map(|exercise| {
                let completed: Vec<_> =
                    exercise.sets.iter().filter(|s| s.completed).collect();
                let average_effort = if completed.is_empty() {
                    0.0
                } else {
                    completed.iter().map(|s| f64::from(s.effort)).sum::<f64>()
                        / completed.len() as f64
                };
                ExerciseEffort {
                    completed_sets: completed.len() as u32,
                    average_effort,
                }
            })
            .collect();

        Self {
            duration_minutes: state.elapsed_seconds / 60,
            planned_exercise_count: state.exercises.len() as u32,
            exercises,
        }
    }
}

/// Assembles the full persisted record from the final session state. Only
/// completed sets contribute to any figure; per-set detail is likewise
/// restricted to completed sets.
pub fn build_record(
    state: &SessionState,
    score: Score,
    body_weight_kg: f64,
    personal_records: Vec<PersonalRecord>,
) -> WorkoutRecord {
    let mut total_volume = 0.0;
    let mut total_sets = 0u32;
    let mut total_reps = 0u32;
    let mut exercises_completed = 0u32;
    let mut exercises = Vec::with_capacity(state.exercises.len());

    for exercise in &state.exercises {
        let sets: Vec<CompletedSet> = exercise
            .sets
            .iter()
            .filter(|s| s.completed)
            .map(|s| CompletedSet {
                weight: parse_metric(&s.weight),
                reps: parse_metric(&s.reps).round() as u32,
                effort: s.effort,
            })
            .collect();

        if !sets.is_empty() {
            exercises_completed += 1;
        }
        total_sets += sets.len() as u32;
        total_reps += sets.iter().map(|s| s.reps).sum::<u32>();
        total_volume += exercise.completed_volume();

        exercises.push(ExerciseDetail {
            name: exercise.identity.name.clone(),
            muscle_group: exercise.identity.muscle_group.clone(),
            notes: exercise.notes.clone(),
            sets,
        });
    }

    let elapsed_hours = state.elapsed_seconds as f64 / 3600.0;
    let estimated_calories =
        (met_for_category(&state.category) * body_weight_kg * elapsed_hours).round() as u32;

    WorkoutRecord {
        summary: WorkoutSummary {
            session_id: state.session_id,
            name: state.name.clone(),
            category: state.category.clone(),
            duration_minutes: state.elapsed_seconds / 60,
            total_volume,
            total_sets,
            total_reps,
            exercises_completed,
            estimated_calories,
            score: score.score,
            grade: score.grade,
            personal_records,
            completed_at: Utc::now(),
        },
        exercises,
    }
}
