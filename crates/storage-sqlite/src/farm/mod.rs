//! SQLite storage implementation for the farm ledger.

mod model;
mod repository;

pub use model::{FarmEntryDB, NewFarmEntryDB};
pub use repository::FarmRepository;

// Re-export trait from core for convenience
pub use faction_core::farm::FarmRepositoryTrait;
