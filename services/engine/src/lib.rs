pub mod adapters;
pub mod config;
pub mod error;
pub mod session;

// Re-export the controller and its dependency bundle to make them easily
// accessible to the host application that embeds the engine.
pub use config::EngineConfig;
pub use error::EngineError;
pub use session::{EngineEvent, EngineState, SessionController};
