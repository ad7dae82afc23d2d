//! services/engine/src/bin/engine.rs
//!
//! A headless driver for the session engine: recovers any autosaved session,
//! otherwise runs a short scripted workout against the real adapters. Useful
//! for exercising the full stack end to end against a local Postgres.

use engine_lib::{
    adapters::{DefaultScoring, FileSnapshotStore, PgPerformanceHistory, PgWorkoutRepository},
    config::EngineConfig,
    error::EngineError,
    session::{EngineState, SessionController},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use workout_core::domain::{ExerciseIdentity, PlannedExercise, WorkoutTemplate};
use workout_core::session::SetField;

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(EngineConfig::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting engine...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let repository = Arc::new(PgWorkoutRepository::new(db_pool.clone()));
    info!("Running database migrations...");
    repository.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Build the Shared EngineState ---
    let store = Arc::new(FileSnapshotStore::new(config.snapshot_dir.clone()).await?);
    let deps = Arc::new(EngineState {
        store,
        repository,
        history: Arc::new(PgPerformanceHistory::new(db_pool)),
        scoring: Arc::new(DefaultScoring),
        config: config.clone(),
    });

    // --- 4. Recover or Start a Session ---
    let controller = match SessionController::recover(deps.clone()).await {
        Some(controller) => {
            info!("Recovered an autosaved session; resuming it.");
            controller.toggle_pause().await;
            controller
        }
        None => SessionController::start(deps, sample_template()).await,
    };

    // --- 5. Run a Short Scripted Workout ---
    controller.update_set_field(0, 0, SetField::Weight("60".to_string())).await;
    controller.update_set_field(0, 0, SetField::Reps("8".to_string())).await;
    controller.complete_set(0, 0).await;
    controller.start_rest(None).await;
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    controller.skip_rest().await;
    controller.update_set_field(0, 1, SetField::Weight("65".to_string())).await;
    controller.update_set_field(0, 1, SetField::Reps("6".to_string())).await;
    controller.complete_set(0, 1).await;

    let summary = controller.complete().await?;
    info!(
        "Workout complete:\n{}",
        serde_json::to_string_pretty(&summary)
            .map_err(|e| EngineError::Internal(e.to_string()))?
    );

    // Give the detached repository insert a moment before the process exits.
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    Ok(())
}

fn sample_template() -> WorkoutTemplate {
    WorkoutTemplate {
        name: "Demo Push Day".to_string(),
        category: "strength".to_string(),
        exercises: vec![PlannedExercise {
            identity: ExerciseIdentity {
                id: Uuid::new_v4(),
                name: "Bench Press".to_string(),
                muscle_group: "chest".to_string(),
            },
            target_sets: 3,
            target_reps: 8,
            rest_seconds: 90,
        }],
    }
}
