pub mod history;
pub mod repo;
pub mod scoring;
pub mod store;

pub use history::PgPerformanceHistory;
pub use repo::PgWorkoutRepository;
pub use scoring::DefaultScoring;
pub use store::FileSnapshotStore;
