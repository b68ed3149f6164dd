//! Payout domain models.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Weekly payout parameters.
///
/// Captured on the weekly closure record at first closure so that later
/// re-closures stay deterministic even if the defaults change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutConfig {
    /// Minimum weekly dirty-money total before any payout is computed.
    pub quota: i64,
    /// Fraction of the over-quota amount that converts into payable funds.
    pub laundering_fraction: Decimal,
    /// Member's share of the laundered amount.
    pub member_share: Decimal,
    /// Household's share of the laundered amount.
    pub household_share: Decimal,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        PayoutConfig {
            quota: 200_000,
            laundering_fraction: dec!(0.60),
            member_share: dec!(0.60),
            household_share: dec!(0.40),
        }
    }
}

impl PayoutConfig {
    /// Validates the configuration ranges.
    ///
    /// Shares not summing to one is a caller error: it is surfaced through
    /// [`PayoutConfig::shares_sum_to_one`] and logged by callers, never
    /// corrected here.
    pub fn validate(&self) -> Result<()> {
        if self.quota < 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Quota cannot be negative: {}",
                self.quota
            ))));
        }
        for (name, fraction) in [
            ("launderingFraction", self.laundering_fraction),
            ("memberShare", self.member_share),
            ("householdShare", self.household_share),
        ] {
            if fraction < Decimal::ZERO || fraction > Decimal::ONE {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "{} must be within 0..=1, got {}",
                    name, fraction
                ))));
            }
        }
        Ok(())
    }

    /// Whether member + household shares cover exactly the laundered amount.
    pub fn shares_sum_to_one(&self) -> bool {
        self.member_share + self.household_share == Decimal::ONE
    }
}

/// Result of the payout computation for a single member and week.
///
/// Derived entirely from ledger entries and the closure-time configuration;
/// never mutated except by a fresh closure recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutBreakdown {
    pub dirty_total: i64,
    pub quota_met: bool,
    pub over_quota: i64,
    pub laundered: i64,
    pub member_payout: i64,
    pub household_payout: i64,
}

impl PayoutBreakdown {
    /// All-zero breakdown for a member with no payable farm.
    pub fn below_quota(dirty_total: i64) -> Self {
        PayoutBreakdown {
            dirty_total,
            quota_met: false,
            over_quota: 0,
            laundered: 0,
            member_payout: 0,
            household_payout: 0,
        }
    }
}
