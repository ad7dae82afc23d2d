pub mod domain;
pub mod ports;
pub mod records;
pub mod session;
pub mod summary;

pub use domain::{
    ExerciseEntry, ExerciseIdentity, HistoricalSet, PersonalRecord, PlannedExercise, PrKind,
    RestTimer, Score, ScoreInput, SessionState, SetRecord, WorkoutRecord, WorkoutSummary,
    WorkoutTemplate,
};
pub use ports::{
    PerformanceHistory, PortError, PortResult, ScoringService, SnapshotStore, WorkoutRepository,
};
pub use records::detect_personal_records;
pub use session::SetField;
pub use summary::{build_record, met_for_category};
