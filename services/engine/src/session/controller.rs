//! services/engine/src/session/controller.rs
//!
//! The session controller: owns the single live `SessionState`, exposes the
//! mutation operations over it, and manages the periodic tick and autosave
//! tasks. Completion and discard are terminal and consume the controller.

use crate::session::{
    autosave::autosave_process, events::EngineEvent, state::EngineState, ticker::tick_process,
    AUTOSAVE_KEY,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use workout_core::domain::{
    ExerciseIdentity, HistoricalSet, ScoreInput, SessionState, WorkoutSummary, WorkoutTemplate,
};
use workout_core::ports::{PortError, PortResult};
use workout_core::records::detect_personal_records;
use workout_core::session::SetField;
use workout_core::summary::build_record;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Controls one active workout session from start to completion or discard.
///
/// All mutations run to completion under the state lock, so callers never
/// observe a half-applied operation. The two periodic activities (timer tick,
/// autosave) share one `CancellationToken` and are torn down together.
pub struct SessionController {
    deps: Arc<EngineState>,
    state: Arc<Mutex<SessionState>>,
    events: broadcast::Sender<EngineEvent>,
    teardown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl SessionController {
    /// Starts a fresh session from a template.
    ///
    /// Historical bests are queried once per planned exercise; a history
    /// failure degrades to "no history" for that exercise. Any previous
    /// session's in-memory state is simply abandoned by its owner; its
    /// autosave entry is overwritten on this session's next autosave tick.
    pub async fn start(deps: Arc<EngineState>, template: WorkoutTemplate) -> Self {
        let mut history: HashMap<String, Vec<HistoricalSet>> = HashMap::new();
        for planned in &template.exercises {
            let name = planned.identity.name.clone();
            match deps.history.best_sets(&name).await {
                Ok(sets) => {
                    history.insert(name, sets);
                }
                Err(e) => {
                    warn!("No history for '{name}': {e}");
                }
            }
        }

        let state = SessionState::from_template(
            template,
            &history,
            deps.config.default_rest_secs,
        );
        info!("Session {} started: {}", state.session_id, state.name);
        Self::spawn(deps, state)
    }

    /// Attempts to restore a prior autosaved session before any new one is
    /// created.
    ///
    /// A missing slot, a failed read, a corrupt snapshot, or a completed
    /// snapshot all mean "nothing to recover". The restored session has its
    /// elapsed time recomputed from `started_at` (the process was not running
    /// to tick it) and comes back paused; the user must explicitly resume.
    pub async fn recover(deps: Arc<EngineState>) -> Option<Self> {
        let value = match deps.store.get(AUTOSAVE_KEY).await {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                warn!("Recovery read failed, starting clean: {e}");
                return None;
            }
        };
        let mut state: SessionState = match serde_json::from_value(value) {
            Ok(state) => state,
            Err(e) => {
                warn!("Recovery snapshot unreadable, starting clean: {e}");
                return None;
            }
        };
        if state.is_completed {
            return None;
        }

        state.elapsed_seconds = (Utc::now() - state.started_at).num_seconds().max(0) as u64;
        state.is_paused = true;
        info!(
            "Session {} recovered at {}s elapsed, paused",
            state.session_id, state.elapsed_seconds
        );
        Some(Self::spawn(deps, state))
    }

    fn spawn(deps: Arc<EngineState>, state: SessionState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let teardown = CancellationToken::new();

        let ticker = tokio::spawn(tick_process(
            state.clone(),
            events.clone(),
            teardown.clone(),
        ));
        let autosave = tokio::spawn(autosave_process(
            state.clone(),
            deps.store.clone(),
            deps.config.autosave_interval_secs,
            teardown.clone(),
        ));

        Self {
            deps,
            state,
            events,
            teardown,
            tasks: vec![ticker, autosave],
        }
    }

    /// Cancels both periodic tasks and waits for them to wind down. An
    /// autosave write already past its cancellation check must land before
    /// the mailbox is deleted, or the deletion would be undone by a stale
    /// snapshot.
    async fn shutdown(&mut self) {
        self.teardown.cancel();
        for handle in self.tasks.drain(..) {
            let _ = handle.await;
        }
    }

    /// Subscribes to engine notifications (rest finished, completion).
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Returns a clone of the current session state.
    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    //=====================================================================================
    // Mutation operations
    //=====================================================================================

    pub async fn update_set_field(&self, exercise_idx: usize, set_idx: usize, field: SetField) {
        self.state.lock().await.update_set_field(exercise_idx, set_idx, field);
    }

    pub async fn complete_set(&self, exercise_idx: usize, set_idx: usize) {
        self.state.lock().await.complete_set(exercise_idx, set_idx);
    }

    pub async fn add_set(&self, exercise_idx: usize) {
        self.state.lock().await.add_set(exercise_idx);
    }

    pub async fn remove_set(&self, exercise_idx: usize, set_idx: usize) {
        self.state.lock().await.remove_set(exercise_idx, set_idx);
    }

    pub async fn swap_exercise(&self, exercise_idx: usize, identity: ExerciseIdentity) {
        let historical = match self.deps.history.best_sets(&identity.name).await {
            Ok(sets) => sets,
            Err(e) => {
                warn!("No history for swapped exercise '{}': {e}", identity.name);
                Vec::new()
            }
        };
        self.state.lock().await.swap_exercise(exercise_idx, identity, historical);
    }

    pub async fn set_current_exercise(&self, idx: usize) {
        self.state.lock().await.set_current_exercise(idx);
    }

    pub async fn toggle_pause(&self) {
        self.state.lock().await.toggle_pause();
    }

    /// Starts the rest countdown; `None` falls back to the current exercise's
    /// configured rest, then the session-wide default.
    pub async fn start_rest(&self, seconds: Option<u64>) {
        let mut session = self.state.lock().await;
        session.start_rest(seconds);
        if session.rest_timer.active {
            let _ = self.events.send(EngineEvent::RestStarted {
                total_seconds: session.rest_timer.total_seconds,
            });
        }
    }

    pub async fn extend_rest(&self, seconds: u64) {
        self.state.lock().await.extend_rest(seconds);
    }

    pub async fn skip_rest(&self) {
        self.state.lock().await.skip_rest();
    }

    //=====================================================================================
    // Terminal transitions
    //=====================================================================================

    /// Completes the workout: detects PRs, computes the summary and score,
    /// marks the state immutable, tears the timers down, deletes the autosave
    /// entry, and hands the record to the remote repository without waiting
    /// for it. The locally computed summary is returned even when any of the
    /// persistence steps fail.
    pub async fn complete(mut self) -> PortResult<WorkoutSummary> {
        let record = {
            let mut session = self.state.lock().await;
            if session.is_completed {
                return Err(PortError::Unexpected(
                    "session is already completed".to_string(),
                ));
            }
            let personal_records = detect_personal_records(&session);
            let score = self.deps.scoring.score(&ScoreInput::from_state(&session));
            session.is_completed = true;
            build_record(
                &session,
                score,
                self.deps.config.body_weight_kg,
                personal_records,
            )
        };

        self.shutdown().await;

        if let Err(e) = self.deps.store.delete(AUTOSAVE_KEY).await {
            warn!("Failed to clear autosave entry after completion: {e}");
        }

        let summary = record.summary.clone();
        info!(
            "Session {} completed: {} sets, {:.0} volume, grade {}",
            summary.session_id, summary.total_sets, summary.total_volume, summary.grade
        );
        let _ = self.events.send(EngineEvent::WorkoutCompleted {
            session_id: summary.session_id,
        });

        // Fire-and-forget: the summary below is already the source of truth.
        let repository = self.deps.repository.clone();
        tokio::spawn(async move {
            if let Err(e) = repository.insert(&record).await {
                error!(
                    "Failed to persist workout {} to the repository: {e}",
                    record.summary.session_id
                );
            }
        });

        Ok(summary)
    }

    /// Abandons the session: cancels all timers and deletes the autosave
    /// entry. Nothing is ever written to the remote repository.
    pub async fn discard(mut self) {
        self.shutdown().await;
        let session_id = self.state.lock().await.session_id;
        if let Err(e) = self.deps.store.delete(AUTOSAVE_KEY).await {
            warn!("Failed to clear autosave entry on discard: {e}");
        }
        info!("Session {session_id} discarded.");
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        // Dropping the controller must never leave tasks ticking against a
        // session nobody owns.
        self.teardown.cancel();
    }
}
