//! crates/workout_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the engine's collaborators.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like databases
//! or on-disk stores. They are injected into the session controller at
//! construction, never looked up globally.

use crate::domain::{HistoricalSet, Score, ScoreInput, WorkoutRecord};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, disk).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Read-only source of prior best performances, queried once at session
/// initialization to seed `historical_best` and the pre-filled weights.
#[async_trait]
pub trait PerformanceHistory: Send + Sync {
    /// Prior best `{weight, reps}` pairs for an exercise, best first.
    /// An exercise with no recorded history yields an empty list.
    async fn best_sets(&self, exercise_name: &str) -> PortResult<Vec<HistoricalSet>>;
}

/// The durable local key-value store backing the single-slot autosave
/// mailbox: at most one in-flight session snapshot exists at a time.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn get(&self, key: &str) -> PortResult<Option<serde_json::Value>>;
    async fn set(&self, key: &str, value: serde_json::Value) -> PortResult<()>;
    async fn delete(&self, key: &str) -> PortResult<()>;
}

/// The remote repository that permanently stores completed workouts.
/// Fire-and-forget from the engine's perspective; an insert failure is
/// never surfaced as a failure of completion itself.
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    async fn insert(&self, record: &WorkoutRecord) -> PortResult<()>;
}

/// The scoring collaborator. A pure function of its input: no side effects,
/// deterministic, so it stays a plain sync trait.
pub trait ScoringService: Send + Sync {
    fn score(&self, input: &ScoreInput) -> Score;
}
