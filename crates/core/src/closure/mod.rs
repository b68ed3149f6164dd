//! Week closure module - snapshot, payout, settle, report.

mod closure_model;
mod closure_service;
mod closure_traits;

#[cfg(test)]
mod closure_service_tests;

pub use closure_model::{ClosureReport, MemberWeekReport, NewWeeklyClosure, WeeklyClosure};
pub use closure_service::WeekClosureService;
pub use closure_traits::{ClosureRepositoryTrait, WeekClosureServiceTrait};
