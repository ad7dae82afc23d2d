//! services/engine/src/session/state.rs
//!
//! Defines the engine's shared dependency bundle.

use crate::config::EngineConfig;
use std::sync::Arc;
use workout_core::ports::{
    PerformanceHistory, ScoringService, SnapshotStore, WorkoutRepository,
};

/// The shared collaborator handles, created once at startup and passed to the
/// session controller at construction.
#[derive(Clone)]
pub struct EngineState {
    pub store: Arc<dyn SnapshotStore>,
    pub repository: Arc<dyn WorkoutRepository>,
    pub history: Arc<dyn PerformanceHistory>,
    pub scoring: Arc<dyn ScoringService>,
    pub config: Arc<EngineConfig>,
}
