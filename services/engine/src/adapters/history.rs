//! services/engine/src/adapters/history.rs
//!
//! The historical-performance source: the concrete implementation of the
//! `PerformanceHistory` port. Prior bests for an exercise come from the set
//! detail of previously persisted workouts.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use workout_core::domain::HistoricalSet;
use workout_core::ports::{PerformanceHistory, PortError, PortResult};

/// How many prior best sets are handed to a fresh session per exercise.
const BEST_SET_LIMIT: i64 = 5;

/// A PostgreSQL adapter that implements the `PerformanceHistory` port.
#[derive(Clone)]
pub struct PgPerformanceHistory {
    pool: PgPool,
}

impl PgPerformanceHistory {
    /// Creates a new `PgPerformanceHistory`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct BestSetRow {
    weight: f64,
    reps: i32,
}

impl BestSetRow {
    fn to_domain(self) -> HistoricalSet {
        HistoricalSet {
            weight: self.weight,
            reps: self.reps.max(0) as u32,
        }
    }
}

#[async_trait]
impl PerformanceHistory for PgPerformanceHistory {
    async fn best_sets(&self, exercise_name: &str) -> PortResult<Vec<HistoricalSet>> {
        let rows = sqlx::query_as::<_, BestSetRow>(
            "SELECT s.weight, s.reps \
             FROM workout_sets s \
             JOIN workout_exercises e ON s.exercise_id = e.id \
             WHERE lower(e.name) = lower($1) \
             ORDER BY s.weight DESC, s.reps DESC \
             LIMIT $2",
        )
        .bind(exercise_name)
        .bind(BEST_SET_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.to_domain()).collect())
    }
}
