use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::settings_constants::{
    SETTING_PAYOUT_HOUSEHOLD_SHARE, SETTING_PAYOUT_LAUNDERING_FRACTION,
    SETTING_PAYOUT_MEMBER_SHARE, SETTING_PAYOUT_QUOTA,
};
use super::settings_traits::SettingsRepositoryTrait;
use crate::errors::{DatabaseError, Error, Result, ValidationError};
use crate::payout::PayoutConfig;

// Define the trait for SettingsService
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    /// Get a single setting value by key. Returns None if not found.
    fn get_setting_value(&self, key: &str) -> Result<Option<String>>;

    /// Set a single setting value by key.
    async fn set_setting_value(&self, key: &str, value: &str) -> Result<()>;

    /// The default payout configuration, falling back to the built-in
    /// defaults for any key that was never set.
    fn payout_config(&self) -> Result<PayoutConfig>;

    /// Persist a payout configuration as the new default.
    async fn update_payout_config(&self, config: &PayoutConfig) -> Result<()>;
}

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService {
            settings_repository,
        }
    }

    fn parse_decimal(&self, key: &str, fallback: Decimal) -> Result<Decimal> {
        match self.get_setting_value(key)? {
            Some(raw) => Decimal::from_str(&raw).map_err(|e| {
                Error::Validation(ValidationError::InvalidInput(format!(
                    "Setting '{}' holds an invalid decimal '{}': {}",
                    key, raw, e
                )))
            }),
            None => Ok(fallback),
        }
    }
}

// Implement the trait for SettingsService
#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_setting_value(&self, key: &str) -> Result<Option<String>> {
        match self.settings_repository.get_setting(key) {
            Ok(value) => Ok(Some(value)),
            Err(Error::Database(DatabaseError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_setting_value(&self, key: &str, value: &str) -> Result<()> {
        self.settings_repository.update_setting(key, value).await
    }

    fn payout_config(&self) -> Result<PayoutConfig> {
        let defaults = PayoutConfig::default();
        let quota = match self.get_setting_value(SETTING_PAYOUT_QUOTA)? {
            Some(raw) => raw.parse::<i64>().map_err(|e| {
                Error::Validation(ValidationError::InvalidInput(format!(
                    "Setting '{}' holds an invalid integer '{}': {}",
                    SETTING_PAYOUT_QUOTA, raw, e
                )))
            })?,
            None => defaults.quota,
        };
        Ok(PayoutConfig {
            quota,
            laundering_fraction: self.parse_decimal(
                SETTING_PAYOUT_LAUNDERING_FRACTION,
                defaults.laundering_fraction,
            )?,
            member_share: self
                .parse_decimal(SETTING_PAYOUT_MEMBER_SHARE, defaults.member_share)?,
            household_share: self
                .parse_decimal(SETTING_PAYOUT_HOUSEHOLD_SHARE, defaults.household_share)?,
        })
    }

    async fn update_payout_config(&self, config: &PayoutConfig) -> Result<()> {
        config.validate()?;
        self.set_setting_value(SETTING_PAYOUT_QUOTA, &config.quota.to_string())
            .await?;
        self.set_setting_value(
            SETTING_PAYOUT_LAUNDERING_FRACTION,
            &config.laundering_fraction.to_string(),
        )
        .await?;
        self.set_setting_value(SETTING_PAYOUT_MEMBER_SHARE, &config.member_share.to_string())
            .await?;
        self.set_setting_value(
            SETTING_PAYOUT_HOUSEHOLD_SHARE,
            &config.household_share.to_string(),
        )
        .await?;
        Ok(())
    }
}
