//! crates/workout_core/src/records.rs
//!
//! Personal-record detection. Pure and deterministic: a function of the
//! final session state and the historical bests supplied at session start,
//! never of live data.

use crate::domain::{ExerciseEntry, PersonalRecord, PrKind, SessionState};
use crate::session::parse_metric;

/// Detects at most one PR per exercise, checked in priority order
/// weight > reps > volume. An exercise with no completed sets or no
/// historical data never registers.
pub fn detect_personal_records(state: &SessionState) -> Vec<PersonalRecord> {
    state.exercises.iter().filter_map(check_exercise).collect()
}

fn check_exercise(exercise: &ExerciseEntry) -> Option<PersonalRecord> {
    if exercise.historical_best.is_empty() {
        return None;
    }
    let completed: Vec<_> = exercise.sets.iter().filter(|s| s.completed).collect();
    if completed.is_empty() {
        return None;
    }

    let record = |kind, previous, achieved| PersonalRecord {
        exercise_name: exercise.identity.name.clone(),
        kind,
        previous,
        achieved,
    };

    let session_weight = completed
        .iter()
        .map(|s| parse_metric(&s.weight))
        .fold(0.0_f64, f64::max);
    let historical_weight = exercise
        .historical_best
        .iter()
        .map(|h| h.weight)
        .fold(0.0_f64, f64::max);
    if session_weight > 0.0 && session_weight > historical_weight {
        return Some(record(PrKind::Weight, historical_weight, session_weight));
    }

    let session_reps = completed
        .iter()
        .map(|s| parse_metric(&s.reps))
        .fold(0.0_f64, f64::max);
    let historical_reps = exercise
        .historical_best
        .iter()
        .map(|h| f64::from(h.reps))
        .fold(0.0_f64, f64::max);
    if session_reps > 0.0 && session_reps > historical_reps {
        return Some(record(PrKind::Reps, historical_reps, session_reps));
    }

    let session_volume = exercise.completed_volume();
    let historical_volume: f64 = exercise
        .historical_best
        .iter()
        .map(|h| h.weight * f64::from(h.reps))
        .sum();
    if session_volume > 0.0 && session_volume > historical_volume {
        return Some(record(PrKind::Volume, historical_volume, session_volume));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ExerciseIdentity, HistoricalSet, PlannedExercise, WorkoutTemplate,
    };
    use crate::session::SetField;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn state_with_history(history: Vec<HistoricalSet>) -> SessionState {
        let template = WorkoutTemplate {
            name: "Push Day".to_string(),
            category: "strength".to_string(),
            exercises: vec![PlannedExercise {
                identity: ExerciseIdentity {
                    id: Uuid::new_v4(),
                    name: "Bench Press".to_string(),
                    muscle_group: "chest".to_string(),
                },
                target_sets: 2,
                target_reps: 5,
                rest_seconds: 120,
            }],
        };
        let mut map = HashMap::new();
        map.insert("Bench Press".to_string(), history);
        SessionState::from_template(template, &map, 90)
    }

    fn log_set(state: &mut SessionState, set: usize, weight: &str, reps: &str) {
        state.update_set_field(0, set, SetField::Weight(weight.to_string()));
        state.update_set_field(0, set, SetField::Reps(reps.to_string()));
        state.complete_set(0, set);
    }

    #[test]
    fn heavier_weight_is_a_weight_pr() {
        let mut state = state_with_history(vec![HistoricalSet { weight: 100.0, reps: 5 }]);
        log_set(&mut state, 0, "105", "5");

        let prs = detect_personal_records(&state);
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].kind, PrKind::Weight);
        assert_eq!(prs[0].previous, 100.0);
        assert_eq!(prs[0].achieved, 105.0);
        assert_eq!(prs[0].exercise_name, "Bench Press");
    }

    #[test]
    fn equal_weight_is_not_a_pr() {
        let mut state = state_with_history(vec![HistoricalSet { weight: 100.0, reps: 5 }]);
        log_set(&mut state, 0, "100", "5");
        // Strictly greater required; same weight, same reps, same volume.
        assert!(detect_personal_records(&state).is_empty());
    }

    #[test]
    fn more_reps_at_lower_weight_is_a_reps_pr() {
        let mut state = state_with_history(vec![HistoricalSet { weight: 100.0, reps: 5 }]);
        log_set(&mut state, 0, "80", "8");

        let prs = detect_personal_records(&state);
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].kind, PrKind::Reps);
        assert_eq!(prs[0].previous, 5.0);
        assert_eq!(prs[0].achieved, 8.0);
    }

    #[test]
    fn higher_total_volume_is_a_volume_pr() {
        let mut state = state_with_history(vec![HistoricalSet { weight: 100.0, reps: 5 }]);
        // Neither weight nor reps beaten, but 100*5 + 100*5 > 500.
        log_set(&mut state, 0, "100", "5");
        log_set(&mut state, 1, "100", "5");

        let prs = detect_personal_records(&state);
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].kind, PrKind::Volume);
        assert_eq!(prs[0].previous, 500.0);
        assert_eq!(prs[0].achieved, 1000.0);
    }

    #[test]
    fn only_the_highest_priority_pr_is_emitted() {
        // Weight, reps, and volume all exceeded; weight wins.
        let mut state = state_with_history(vec![HistoricalSet { weight: 100.0, reps: 5 }]);
        log_set(&mut state, 0, "110", "10");
        log_set(&mut state, 1, "110", "10");

        let prs = detect_personal_records(&state);
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].kind, PrKind::Weight);
    }

    #[test]
    fn no_history_means_no_pr() {
        let mut state = state_with_history(Vec::new());
        log_set(&mut state, 0, "500", "20");
        assert!(detect_personal_records(&state).is_empty());
    }

    #[test]
    fn incomplete_sets_are_invisible_to_detection() {
        let mut state = state_with_history(vec![HistoricalSet { weight: 100.0, reps: 5 }]);
        state.update_set_field(0, 0, SetField::Weight("150".to_string()));
        state.update_set_field(0, 0, SetField::Reps("5".to_string()));
        assert!(detect_personal_records(&state).is_empty());
    }

    #[test]
    fn detection_is_idempotent() {
        let mut state = state_with_history(vec![HistoricalSet { weight: 100.0, reps: 5 }]);
        log_set(&mut state, 0, "105", "5");
        assert_eq!(detect_personal_records(&state), detect_personal_records(&state));
    }
}
