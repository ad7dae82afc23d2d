//! services/engine/src/session/ticker.rs
//!
//! The shared one-second scheduler tick driving both timers. The elapsed
//! counter and the rest countdown are independent state machines inside
//! `SessionState`; this task only advances them, once per second, under a
//! single lock acquisition.

use crate::session::events::EngineEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::info;
use workout_core::domain::SessionState;

/// Advances the session's timers once per second until cancelled.
///
/// Ticks are best-effort: under scheduling pressure they may drift, which the
/// engine explicitly tolerates. The first tick fires one full period after
/// startup, not immediately.
pub async fn tick_process(
    session_state_lock: Arc<Mutex<SessionState>>,
    events: broadcast::Sender<EngineEvent>,
    cancellation_token: CancellationToken,
) {
    let period = Duration::from_secs(1);
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                info!("Tick process cancelled.");
                return;
            }
            _ = interval.tick() => {
                let mut session = session_state_lock.lock().await;
                if session.is_completed {
                    return;
                }
                session.tick_elapsed();
                if session.tick_rest() {
                    // Nobody listening is fine.
                    let _ = events.send(EngineEvent::RestFinished);
                }
            }
        }
    }
}
