//! Farm ledger module - domain models, services, and traits.

mod farm_constants;
mod farm_model;
mod farm_service;
mod farm_traits;


pub use farm_constants::*;
pub use farm_model::{FarmEntry, NewFarmEntry, ResourceType};
pub use farm_service::FarmLedgerService;
pub use farm_traits::{FarmLedgerServiceTrait, FarmRepositoryTrait};
