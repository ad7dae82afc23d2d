//! services/engine/src/adapters/repo.rs
//!
//! The remote workout repository adapter: the concrete implementation of the
//! `WorkoutRepository` port over PostgreSQL using `sqlx`. One completed
//! workout becomes one `workouts` row plus its exercise and set detail rows,
//! written in a single transaction.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;
use workout_core::domain::{PrKind, WorkoutRecord};
use workout_core::ports::{PortError, PortResult, WorkoutRepository};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A PostgreSQL adapter that implements the `WorkoutRepository` port.
#[derive(Clone)]
pub struct PgWorkoutRepository {
    pool: PgPool,
}

impl PgWorkoutRepository {
    /// Creates a new `PgWorkoutRepository`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn pr_kind_label(kind: PrKind) -> &'static str {
    match kind {
        PrKind::Weight => "weight",
        PrKind::Reps => "reps",
        PrKind::Volume => "volume",
    }
}

//=========================================================================================
// `WorkoutRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl WorkoutRepository for PgWorkoutRepository {
    async fn insert(&self, record: &WorkoutRecord) -> PortResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let summary = &record.summary;
        sqlx::query(
            "INSERT INTO workouts \
             (id, name, category, duration_minutes, total_volume, total_sets, total_reps, \
              exercises_completed, estimated_calories, score, grade, completed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(summary.session_id)
        .bind(&summary.name)
        .bind(&summary.category)
        .bind(summary.duration_minutes as i64)
        .bind(summary.total_volume)
        .bind(summary.total_sets as i32)
        .bind(summary.total_reps as i32)
        .bind(summary.exercises_completed as i32)
        .bind(summary.estimated_calories as i32)
        .bind(summary.score)
        .bind(&summary.grade)
        .bind(summary.completed_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        for (position, exercise) in record.exercises.iter().enumerate() {
            let exercise_id = Uuid::new_v4();
            sqlx::query(
                "INSERT INTO workout_exercises \
                 (id, workout_id, position, name, muscle_group, notes) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(exercise_id)
            .bind(summary.session_id)
            .bind(position as i32)
            .bind(&exercise.name)
            .bind(&exercise.muscle_group)
            .bind(&exercise.notes)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

            for (i, set) in exercise.sets.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO workout_sets \
                     (id, exercise_id, set_number, weight, reps, effort) \
                     VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(Uuid::new_v4())
                .bind(exercise_id)
                .bind(i as i32 + 1)
                .bind(set.weight)
                .bind(set.reps as i32)
                .bind(i32::from(set.effort))
                .execute(&mut *tx)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
            }
        }

        for pr in &summary.personal_records {
            sqlx::query(
                "INSERT INTO workout_prs \
                 (workout_id, exercise_name, kind, previous, achieved) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(summary.session_id)
            .bind(&pr.exercise_name)
            .bind(pr_kind_label(pr.kind))
            .bind(pr.previous)
            .bind(pr.achieved)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}
