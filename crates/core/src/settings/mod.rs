//! Settings module - persisted key/value configuration.

mod settings_constants;
mod settings_service;
mod settings_traits;

pub use settings_constants::*;
pub use settings_service::{SettingsService, SettingsServiceTrait};
pub use settings_traits::SettingsRepositoryTrait;
