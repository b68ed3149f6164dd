//! Faction Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for the faction administration
//! system: the member registry, the weekly farm ledger and its payout/closure
//! protocol, and the order workflow. It is database-agnostic and defines
//! traits that are implemented by the `storage-sqlite` crate.

pub mod closure;
pub mod errors;
pub mod farm;
pub mod members;
pub mod orders;
pub mod payout;
pub mod settings;
pub mod week;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

// Re-export the week identifier, used across every module boundary
pub use week::FarmWeek;
