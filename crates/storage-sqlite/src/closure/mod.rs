//! SQLite storage implementation for weekly closures.

mod model;
mod repository;

pub use model::{NewWeeklyClosureDB, WeeklyClosureDB};
pub use repository::ClosureRepository;

// Re-export trait from core for convenience
pub use faction_core::closure::ClosureRepositoryTrait;
