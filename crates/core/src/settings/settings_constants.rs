/// Setting keys for the default payout configuration.
pub const SETTING_PAYOUT_QUOTA: &str = "payout_quota";
pub const SETTING_PAYOUT_LAUNDERING_FRACTION: &str = "payout_laundering_fraction";
pub const SETTING_PAYOUT_MEMBER_SHARE: &str = "payout_member_share";
pub const SETTING_PAYOUT_HOUSEHOLD_SHARE: &str = "payout_household_share";
