//! services/engine/src/session/autosave.rs
//!
//! The periodic durable-snapshot task. While the session is live, the entire
//! `SessionState` is written to the single mailbox slot on a fixed interval;
//! a failed write is logged and simply retried on the next tick.

use crate::session::AUTOSAVE_KEY;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use workout_core::domain::SessionState;
use workout_core::ports::SnapshotStore;

/// Serializes the session to the snapshot store every `interval_secs` until
/// cancelled or the session completes.
pub async fn autosave_process(
    session_state_lock: Arc<Mutex<SessionState>>,
    store: Arc<dyn SnapshotStore>,
    interval_secs: u64,
    cancellation_token: CancellationToken,
) {
    let period = Duration::from_secs(interval_secs.max(1));
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                info!("Autosave process cancelled.");
                return;
            }
            _ = interval.tick() => {
                let snapshot = {
                    let session = session_state_lock.lock().await;
                    if session.is_completed {
                        return;
                    }
                    serde_json::to_value(&*session)
                };
                match snapshot {
                    Ok(value) => {
                        if let Err(e) = store.set(AUTOSAVE_KEY, value).await {
                            warn!("Autosave tick skipped, store write failed: {e}");
                        }
                    }
                    Err(e) => warn!("Autosave tick skipped, serialization failed: {e}"),
                }
            }
        }
    }
}
