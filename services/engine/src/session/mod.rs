pub mod autosave;
pub mod controller;
pub mod events;
pub mod state;
pub mod ticker;

/// The single mailbox slot in the snapshot store. At most one in-flight
/// session snapshot exists at a time; a new session overwrites any prior one.
pub const AUTOSAVE_KEY: &str = "active_session";

pub use controller::SessionController;
pub use events::EngineEvent;
pub use state::EngineState;
