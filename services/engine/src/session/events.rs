//! services/engine/src/session/events.rs
//!
//! Defines the notifications the engine pushes to whatever surface is
//! listening (a UI, a test harness). Delivered over a `tokio::sync::broadcast`
//! channel; sends never block and a lagging subscriber only loses its own
//! backlog.

use serde::Serialize;
use uuid::Uuid;

/// Represents the structured notifications the engine emits while a session
/// is live.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A rest countdown began.
    RestStarted { total_seconds: u64 },

    /// A rest countdown reached zero on its own. Skipping a rest does not
    /// emit this.
    RestFinished,

    /// The session reached its terminal state and a summary was produced.
    WorkoutCompleted { session_id: Uuid },
}
