//! crates/workout_core/src/session.rs
//!
//! Construction and mutation of [`SessionState`]. Every operation here is a
//! synchronous total function: no operation panics for any well-typed input,
//! out-of-range indices are no-ops, and a completed session ignores all
//! mutations. The async scheduling that drives the per-second tick
//! transitions lives in the service crate.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    HistoricalSet, ExerciseEntry, ExerciseIdentity, RestTimer, SessionState, SetRecord,
    WorkoutTemplate,
};

/// A single-field replacement on one [`SetRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum SetField {
    Weight(String),
    Reps(String),
    Effort(u8),
}

/// Defensive numeric parse for the free-form `weight`/`reps` text fields.
/// Invalid, empty, negative, or non-finite input is treated as 0.
pub fn parse_metric(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

fn format_metric(value: f64) -> String {
    if value <= 0.0 {
        String::new()
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

impl SessionState {
    /// Creates a fresh session from a template plus historical best data.
    ///
    /// For each planned exercise, `target_sets` empty sets are created with
    /// the `weight` field pre-filled from the historical set at the same
    /// index when available (fallback: empty). A template planning zero sets
    /// is normalized to one: an exercise always holds at least one set, the
    /// same floor `remove_set` enforces.
    pub fn from_template(
        template: WorkoutTemplate,
        history: &HashMap<String, Vec<HistoricalSet>>,
        default_rest_seconds: u64,
    ) -> Self {
        let exercises = template
            .exercises
            .into_iter()
            .map(|planned| {
                let historical_best = history
                    .get(&planned.identity.name)
                    .cloned()
                    .unwrap_or_default();
                let sets = (1..=planned.target_sets.max(1))
                    .map(|n| {
                        let mut set = SetRecord::empty(n);
                        if let Some(prior) = historical_best.get(n as usize - 1) {
                            set.weight = format_metric(prior.weight);
                        }
                        set
                    })
                    .collect();
                ExerciseEntry {
                    identity: planned.identity,
                    target_sets: planned.target_sets,
                    target_reps: planned.target_reps,
                    rest_seconds: planned.rest_seconds,
                    sets,
                    notes: String::new(),
                    historical_best,
                }
            })
            .collect();

        Self {
            session_id: Uuid::new_v4(),
            name: template.name,
            category: template.category,
            started_at: Utc::now(),
            exercises,
            elapsed_seconds: 0,
            current_exercise_index: 0,
            is_paused: false,
            is_completed: false,
            rest_timer: RestTimer::idle(default_rest_seconds),
        }
    }

    fn set_mut(&mut self, exercise_idx: usize, set_idx: usize) -> Option<&mut SetRecord> {
        if self.is_completed {
            return None;
        }
        self.exercises
            .get_mut(exercise_idx)
            .and_then(|e| e.sets.get_mut(set_idx))
    }

    /// Replaces one field of one set. Effort is clamped to 1-10.
    pub fn update_set_field(&mut self, exercise_idx: usize, set_idx: usize, field: SetField) {
        if let Some(set) = self.set_mut(exercise_idx, set_idx) {
            match field {
                SetField::Weight(weight) => set.weight = weight,
                SetField::Reps(reps) => set.reps = reps,
                SetField::Effort(effort) => set.effort = effort.clamp(1, 10),
            }
        }
    }

    /// Marks a set completed and stamps `completed_at` once. Idempotent: a
    /// second call leaves the original timestamp untouched.
    pub fn complete_set(&mut self, exercise_idx: usize, set_idx: usize) {
        if let Some(set) = self.set_mut(exercise_idx, set_idx) {
            if !set.completed {
                set.completed = true;
                set.completed_at = Some(Utc::now());
            }
        }
    }

    /// Appends a new set, carrying forward weight and effort from the last
    /// existing set as a convenience.
    pub fn add_set(&mut self, exercise_idx: usize) {
        if self.is_completed {
            return;
        }
        if let Some(exercise) = self.exercises.get_mut(exercise_idx) {
            let mut set = SetRecord::empty(exercise.sets.len() as u32 + 1);
            if let Some(last) = exercise.sets.last() {
                set.weight = last.weight.clone();
                set.effort = last.effort;
            }
            exercise.sets.push(set);
        }
    }

    /// Removes a set and renumbers the remainder to stay contiguous from 1.
    /// Refuses to remove the last remaining set.
    pub fn remove_set(&mut self, exercise_idx: usize, set_idx: usize) {
        if self.is_completed {
            return;
        }
        if let Some(exercise) = self.exercises.get_mut(exercise_idx) {
            if exercise.sets.len() <= 1 || set_idx >= exercise.sets.len() {
                return;
            }
            exercise.sets.remove(set_idx);
            for (i, set) in exercise.sets.iter_mut().enumerate() {
                set.set_number = i as u32 + 1;
            }
        }
    }

    /// Replaces one exercise's identity and history, resetting all its sets
    /// to uncompleted with cleared weight/reps. A swap forfeits in-progress
    /// data for that exercise only.
    pub fn swap_exercise(
        &mut self,
        exercise_idx: usize,
        identity: ExerciseIdentity,
        historical_best: Vec<HistoricalSet>,
    ) {
        if self.is_completed {
            return;
        }
        if let Some(exercise) = self.exercises.get_mut(exercise_idx) {
            exercise.identity = identity;
            exercise.historical_best = historical_best;
            for set in &mut exercise.sets {
                set.completed = false;
                set.completed_at = None;
                set.weight.clear();
                set.reps.clear();
            }
        }
    }

    pub fn set_current_exercise(&mut self, idx: usize) {
        if !self.is_completed && idx < self.exercises.len() {
            self.current_exercise_index = idx;
        }
    }

    pub fn toggle_pause(&mut self) {
        if !self.is_completed {
            self.is_paused = !self.is_paused;
        }
    }

    //=====================================================================================
    // Timer transitions, driven once per second by the service crate ticker
    //=====================================================================================

    /// Advances the elapsed counter by one second while unpaused. There is no
    /// catch-up compensation for time spent paused.
    pub fn tick_elapsed(&mut self) {
        if !self.is_paused && !self.is_completed {
            self.elapsed_seconds += 1;
        }
    }

    /// Starts the rest countdown. An explicit duration wins; otherwise the
    /// current exercise's configured rest (when nonzero), otherwise the
    /// session-wide default.
    pub fn start_rest(&mut self, seconds: Option<u64>) {
        if self.is_completed {
            return;
        }
        let chosen = seconds
            .or_else(|| {
                self.exercises
                    .get(self.current_exercise_index)
                    .map(|e| e.rest_seconds)
                    .filter(|s| *s > 0)
            })
            .unwrap_or(self.rest_timer.default_seconds);
        if chosen == 0 {
            return;
        }
        self.rest_timer.active = true;
        self.rest_timer.total_seconds = chosen;
        self.rest_timer.remaining_seconds = chosen;
    }

    /// Counts the rest timer down by one second. Returns `true` exactly once,
    /// on the tick that reaches zero. Runs regardless of `is_paused`: pausing
    /// the session does not freeze an in-flight rest countdown.
    pub fn tick_rest(&mut self) -> bool {
        if self.is_completed || !self.rest_timer.active {
            return false;
        }
        self.rest_timer.remaining_seconds = self.rest_timer.remaining_seconds.saturating_sub(1);
        if self.rest_timer.remaining_seconds == 0 {
            self.rest_timer.active = false;
            return true;
        }
        false
    }

    /// Adds time to an active rest countdown.
    pub fn extend_rest(&mut self, seconds: u64) {
        if !self.is_completed && self.rest_timer.active {
            self.rest_timer.total_seconds += seconds;
            self.rest_timer.remaining_seconds += seconds;
        }
    }

    /// Ends the rest countdown immediately.
    pub fn skip_rest(&mut self) {
        if !self.is_completed {
            self.rest_timer.active = false;
            self.rest_timer.remaining_seconds = 0;
        }
    }
}

impl ExerciseEntry {
    /// Sum of weight × reps over completed sets.
    pub fn completed_volume(&self) -> f64 {
        self.sets
            .iter()
            .filter(|s| s.completed)
            .map(|s| parse_metric(&s.weight) * parse_metric(&s.reps))
            .sum()
    }

    pub fn completed_set_count(&self) -> u32 {
        self.sets.iter().filter(|s| s.completed).count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlannedExercise;

    fn identity(name: &str) -> ExerciseIdentity {
        ExerciseIdentity {
            id: Uuid::new_v4(),
            name: name.to_string(),
            muscle_group: "chest".to_string(),
        }
    }

    fn template() -> WorkoutTemplate {
        WorkoutTemplate {
            name: "Push Day".to_string(),
            category: "strength".to_string(),
            exercises: vec![PlannedExercise {
                identity: identity("Bench Press"),
                target_sets: 3,
                target_reps: 8,
                rest_seconds: 120,
            }],
        }
    }

    fn session() -> SessionState {
        SessionState::from_template(template(), &HashMap::new(), 90)
    }

    #[test]
    fn parse_metric_defends_against_garbage() {
        assert_eq!(parse_metric("100"), 100.0);
        assert_eq!(parse_metric(" 62.5 "), 62.5);
        assert_eq!(parse_metric(""), 0.0);
        assert_eq!(parse_metric("abc"), 0.0);
        assert_eq!(parse_metric("-5"), 0.0);
        assert_eq!(parse_metric("NaN"), 0.0);
    }

    #[test]
    fn from_template_prefills_weights_from_history() {
        let mut history = HashMap::new();
        history.insert(
            "Bench Press".to_string(),
            vec![
                HistoricalSet { weight: 100.0, reps: 5 },
                HistoricalSet { weight: 95.0, reps: 8 },
            ],
        );
        let state = SessionState::from_template(template(), &history, 90);

        let sets = &state.exercises[0].sets;
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0].weight, "100");
        assert_eq!(sets[1].weight, "95");
        // No third historical set: falls back to empty.
        assert_eq!(sets[2].weight, "");
        assert_eq!(sets.iter().map(|s| s.set_number).collect::<Vec<_>>(), [1, 2, 3]);
        assert!(!state.is_paused);
        assert!(!state.is_completed);
        assert_eq!(state.elapsed_seconds, 0);
    }

    #[test]
    fn zero_target_sets_is_normalized_to_one_set() {
        let mut template = template();
        template.exercises[0].target_sets = 0;
        let state = SessionState::from_template(template, &HashMap::new(), 90);
        assert_eq!(state.exercises[0].sets.len(), 1);
        assert_eq!(state.exercises[0].sets[0].set_number, 1);
        assert_eq!(state.exercises[0].target_sets, 0);
    }

    #[test]
    fn add_then_remove_keeps_numbering_contiguous() {
        let mut state = session();
        state.add_set(0);
        assert_eq!(state.exercises[0].sets.len(), 4);
        assert_eq!(
            state.exercises[0].sets.iter().map(|s| s.set_number).collect::<Vec<_>>(),
            [1, 2, 3, 4]
        );

        state.remove_set(0, 1);
        assert_eq!(state.exercises[0].sets.len(), 3);
        assert_eq!(
            state.exercises[0].sets.iter().map(|s| s.set_number).collect::<Vec<_>>(),
            [1, 2, 3]
        );
    }

    #[test]
    fn numbering_survives_arbitrary_add_remove_sequences() {
        let mut state = session();
        for _ in 0..5 {
            state.add_set(0);
        }
        state.remove_set(0, 0);
        state.remove_set(0, 3);
        state.remove_set(0, 9); // out of range, no-op
        state.add_set(0);

        let numbers: Vec<u32> = state.exercises[0].sets.iter().map(|s| s.set_number).collect();
        let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
        assert_eq!(numbers, expected);
    }

    #[test]
    fn remove_set_refuses_to_empty_an_exercise() {
        let mut state = session();
        state.remove_set(0, 0);
        state.remove_set(0, 0);
        assert_eq!(state.exercises[0].sets.len(), 1);
    }

    #[test]
    fn add_set_carries_forward_weight_and_effort() {
        let mut state = session();
        state.update_set_field(0, 2, SetField::Weight("80".to_string()));
        state.update_set_field(0, 2, SetField::Effort(9));
        state.add_set(0);

        let added = state.exercises[0].sets.last().unwrap();
        assert_eq!(added.weight, "80");
        assert_eq!(added.effort, 9);
        assert!(!added.completed);
    }

    #[test]
    fn effort_is_clamped_to_valid_range() {
        let mut state = session();
        state.update_set_field(0, 0, SetField::Effort(0));
        assert_eq!(state.exercises[0].sets[0].effort, 1);
        state.update_set_field(0, 0, SetField::Effort(15));
        assert_eq!(state.exercises[0].sets[0].effort, 10);
    }

    #[test]
    fn out_of_range_indices_are_no_ops() {
        let mut state = session();
        let before = state.clone();
        state.update_set_field(5, 0, SetField::Weight("100".to_string()));
        state.update_set_field(0, 9, SetField::Reps("5".to_string()));
        state.complete_set(3, 3);
        state.add_set(7);
        state.remove_set(0, 99);
        state.set_current_exercise(42);
        assert_eq!(state, before);
    }

    #[test]
    fn complete_set_is_idempotent() {
        let mut state = session();
        state.complete_set(0, 0);
        let first_stamp = state.exercises[0].sets[0].completed_at;
        assert!(first_stamp.is_some());

        state.complete_set(0, 0);
        assert_eq!(state.exercises[0].sets[0].completed_at, first_stamp);
    }

    #[test]
    fn volume_is_a_pure_function_of_final_state() {
        let mut a = session();
        a.update_set_field(0, 0, SetField::Weight("100".to_string()));
        a.update_set_field(0, 0, SetField::Reps("5".to_string()));
        a.update_set_field(0, 1, SetField::Weight("90".to_string()));
        a.update_set_field(0, 1, SetField::Reps("8".to_string()));
        a.complete_set(0, 0);
        a.complete_set(0, 1);

        // Same final field values, different call order.
        let mut b = session();
        b.update_set_field(0, 1, SetField::Reps("3".to_string()));
        b.update_set_field(0, 1, SetField::Reps("8".to_string()));
        b.update_set_field(0, 1, SetField::Weight("90".to_string()));
        b.update_set_field(0, 0, SetField::Reps("5".to_string()));
        b.update_set_field(0, 0, SetField::Weight("100".to_string()));
        b.complete_set(0, 1);
        b.complete_set(0, 0);

        assert_eq!(a.exercises[0].completed_volume(), 100.0 * 5.0 + 90.0 * 8.0);
        assert_eq!(a.exercises[0].completed_volume(), b.exercises[0].completed_volume());
    }

    #[test]
    fn incomplete_sets_never_count_toward_volume() {
        let mut state = session();
        state.update_set_field(0, 0, SetField::Weight("100".to_string()));
        state.update_set_field(0, 0, SetField::Reps("5".to_string()));
        assert_eq!(state.exercises[0].completed_volume(), 0.0);

        state.complete_set(0, 0);
        assert_eq!(state.exercises[0].completed_volume(), 500.0);
    }

    #[test]
    fn swap_resets_sets_but_keeps_structure() {
        let mut state = session();
        state.update_set_field(0, 0, SetField::Weight("100".to_string()));
        state.update_set_field(0, 0, SetField::Reps("5".to_string()));
        state.complete_set(0, 0);

        let new_history = vec![HistoricalSet { weight: 40.0, reps: 12 }];
        state.swap_exercise(0, identity("Incline Press"), new_history.clone());

        let exercise = &state.exercises[0];
        assert_eq!(exercise.identity.name, "Incline Press");
        assert_eq!(exercise.historical_best, new_history);
        assert_eq!(exercise.sets.len(), 3);
        assert_eq!(exercise.target_sets, 3);
        for set in &exercise.sets {
            assert!(!set.completed);
            assert!(set.completed_at.is_none());
            assert_eq!(set.weight, "");
            assert_eq!(set.reps, "");
        }
    }

    #[test]
    fn pause_freezes_elapsed_and_resume_continues() {
        let mut state = session();
        for _ in 0..5 {
            state.tick_elapsed();
        }
        assert_eq!(state.elapsed_seconds, 5);

        state.toggle_pause();
        for _ in 0..10 {
            state.tick_elapsed();
        }
        assert_eq!(state.elapsed_seconds, 5);

        // Resumes from the paused value, with no catch-up.
        state.toggle_pause();
        state.tick_elapsed();
        assert_eq!(state.elapsed_seconds, 6);
    }

    #[test]
    fn rest_timer_counts_down_and_signals_once() {
        let mut state = session();
        state.start_rest(Some(3));
        assert!(state.rest_timer.active);
        assert_eq!(state.rest_timer.total_seconds, 3);

        assert!(!state.tick_rest());
        assert!(!state.tick_rest());
        assert!(state.tick_rest());
        assert!(!state.rest_timer.active);
        assert_eq!(state.rest_timer.remaining_seconds, 0);
        // Idle timer never signals again.
        assert!(!state.tick_rest());
    }

    #[test]
    fn rest_timer_defaults_to_exercise_rest_then_session_default() {
        let mut state = session();
        state.start_rest(None);
        assert_eq!(state.rest_timer.total_seconds, 120);

        state.skip_rest();
        state.exercises[0].rest_seconds = 0;
        state.start_rest(None);
        assert_eq!(state.rest_timer.total_seconds, 90);
    }

    #[test]
    fn rest_timer_runs_while_session_is_paused() {
        let mut state = session();
        state.start_rest(Some(2));
        state.toggle_pause();

        state.tick_elapsed();
        assert_eq!(state.elapsed_seconds, 0);
        assert!(!state.tick_rest());
        assert_eq!(state.rest_timer.remaining_seconds, 1);
    }

    #[test]
    fn extend_and_skip_rest() {
        let mut state = session();
        state.start_rest(Some(10));
        state.extend_rest(30);
        assert_eq!(state.rest_timer.total_seconds, 40);
        assert_eq!(state.rest_timer.remaining_seconds, 40);

        state.skip_rest();
        assert!(!state.rest_timer.active);
        assert_eq!(state.rest_timer.remaining_seconds, 0);

        // Extending an idle timer does nothing.
        state.extend_rest(30);
        assert_eq!(state.rest_timer.remaining_seconds, 0);
    }

    #[test]
    fn completed_session_ignores_all_mutations() {
        let mut state = session();
        state.complete_set(0, 0);
        state.is_completed = true;
        let before = state.clone();

        state.update_set_field(0, 1, SetField::Weight("200".to_string()));
        state.complete_set(0, 1);
        state.add_set(0);
        state.remove_set(0, 0);
        state.swap_exercise(0, identity("Dips"), Vec::new());
        state.toggle_pause();
        state.tick_elapsed();
        state.start_rest(Some(60));
        assert!(!state.tick_rest());

        assert_eq!(state, before);
    }
}
