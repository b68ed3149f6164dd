//! The weekly payout calculation.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use super::payout_model::{PayoutBreakdown, PayoutConfig};

/// Computes the payout split for one member's weekly dirty-money total.
///
/// Below quota nothing is payable. At or above quota, the over-quota amount
/// is laundered and the laundered amount is split between member and
/// household. Every multiplication truncates toward zero before the next
/// step (floor after laundering, floor again after each share), so the split
/// parts may sum to slightly less than the laundered amount.
///
/// Pure function: inputs are expected non-negative and range-checked by the
/// caller (see [`PayoutConfig::validate`]); no validation happens here.
pub fn compute_payout(dirty_total: i64, config: &PayoutConfig) -> PayoutBreakdown {
    if dirty_total < config.quota {
        return PayoutBreakdown::below_quota(dirty_total);
    }

    let over_quota = dirty_total - config.quota;
    let laundered = floor_mul(over_quota, config.laundering_fraction);

    PayoutBreakdown {
        dirty_total,
        quota_met: true,
        over_quota,
        laundered,
        member_payout: floor_mul(laundered, config.member_share),
        household_payout: floor_mul(laundered, config.household_share),
    }
}

fn floor_mul(amount: i64, fraction: Decimal) -> i64 {
    (Decimal::from(amount) * fraction)
        .floor()
        .to_i64()
        .unwrap_or(0)
}
