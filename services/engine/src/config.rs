//! services/engine/src/config.rs
//!
//! Defines the engine's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub database_url: String,
    pub log_level: Level,
    /// Directory holding the autosave mailbox.
    pub snapshot_dir: PathBuf,
    /// Seconds between durable snapshots of the active session.
    pub autosave_interval_secs: u64,
    /// Session-wide rest duration used when an exercise configures none.
    pub default_rest_secs: u64,
    /// Body weight fed into the calorie estimate.
    pub body_weight_kg: f64,
}

impl EngineConfig {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let snapshot_dir = std::env::var("SNAPSHOT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./autosave"));

        let autosave_interval_secs = parse_var("AUTOSAVE_INTERVAL_SECS", 10)?;
        let default_rest_secs = parse_var("DEFAULT_REST_SECS", 90)?;
        let body_weight_kg = parse_var("BODY_WEIGHT_KG", 75.0)?;

        Ok(Self {
            database_url,
            log_level,
            snapshot_dir,
            autosave_interval_secs,
            default_rest_secs,
            body_weight_kg,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}
