//! services/engine/src/adapters/scoring.rs
//!
//! The scoring collaborator: a pure, deterministic implementation of the
//! `ScoringService` port. Completion carries most of the weight, exertion
//! and duration the rest.

use workout_core::domain::{Score, ScoreInput};
use workout_core::ports::ScoringService;

const COMPLETION_POINTS: f64 = 60.0;
const EFFORT_POINTS: f64 = 25.0;
const DURATION_POINTS: f64 = 15.0;

/// The default workout scoring formula, 0-100 with a letter grade.
#[derive(Clone, Default)]
pub struct DefaultScoring;

impl ScoringService for DefaultScoring {
    fn score(&self, input: &ScoreInput) -> Score {
        let worked: Vec<_> = input
            .exercises
            .iter()
            .filter(|e| e.completed_sets > 0)
            .collect();

        let completion_ratio = if input.planned_exercise_count == 0 {
            0.0
        } else {
            worked.len() as f64 / f64::from(input.planned_exercise_count)
        };

        let effort_ratio = if worked.is_empty() {
            0.0
        } else {
            let average = worked.iter().map(|e| e.average_effort).sum::<f64>()
                / worked.len() as f64;
            (average / 10.0).clamp(0.0, 1.0)
        };

        // Full duration credit at one hour.
        let duration_ratio = (input.duration_minutes as f64 / 60.0).min(1.0);

        let score = completion_ratio * COMPLETION_POINTS
            + effort_ratio * EFFORT_POINTS
            + duration_ratio * DURATION_POINTS;

        Score {
            score,
            grade: grade_for(score).to_string(),
        }
    }
}

fn grade_for(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "A",
        s if s >= 75.0 => "B",
        s if s >= 60.0 => "C",
        s if s >= 40.0 => "D",
        _ => "F",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workout_core::domain::ExerciseEffort;

    fn input(exercises: Vec<ExerciseEffort>, duration_minutes: u64) -> ScoreInput {
        ScoreInput {
            duration_minutes,
            planned_exercise_count: exercises.len() as u32,
            exercises,
        }
    }

    #[test]
    fn full_completion_at_high_effort_scores_an_a() {
        let score = DefaultScoring.score(&input(
            vec![
                ExerciseEffort { completed_sets: 3, average_effort: 9.0 },
                ExerciseEffort { completed_sets: 4, average_effort: 8.0 },
            ],
            60,
        ));
        // 60 + 8.5/10*25 + 15 = 96.25
        assert_eq!(score.score, 96.25);
        assert_eq!(score.grade, "A");
    }

    #[test]
    fn skipped_exercises_drag_the_score_down() {
        let score = DefaultScoring.score(&input(
            vec![
                ExerciseEffort { completed_sets: 3, average_effort: 7.0 },
                ExerciseEffort { completed_sets: 0, average_effort: 0.0 },
            ],
            30,
        ));
        // 30 + 17.5 + 7.5 = 55
        assert_eq!(score.score, 55.0);
        assert_eq!(score.grade, "D");
    }

    #[test]
    fn empty_session_scores_zero() {
        let score = DefaultScoring.score(&input(Vec::new(), 0));
        assert_eq!(score.score, 0.0);
        assert_eq!(score.grade, "F");
    }

    #[test]
    fn scoring_is_deterministic() {
        let i = input(vec![ExerciseEffort { completed_sets: 2, average_effort: 6.0 }], 45);
        assert_eq!(DefaultScoring.score(&i), DefaultScoring.score(&i));
    }
}
