//! Week closure domain models.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::farm::ResourceType;
use crate::payout::{PayoutBreakdown, PayoutConfig};
use crate::week::FarmWeek;

/// One processed week. At most one record exists per (week, year).
///
/// The payout configuration is captured here at first closure; re-closures
/// reuse it so their reports stay deterministic even if defaults change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyClosure {
    pub id: String,
    pub week: FarmWeek,
    pub closed: bool,
    pub closed_by: String,
    pub closed_at: NaiveDateTime,
    pub total_members: i32,
    pub total_dirty_money: i64,
    pub total_member_payout: i64,
    pub total_household_payout: i64,
    pub members_met_quota: i32,
    pub config: PayoutConfig,
}

/// Input model for finalizing a week.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWeeklyClosure {
    pub week: FarmWeek,
    pub closed_by: String,
    pub total_members: i32,
    pub total_dirty_money: i64,
    pub total_member_payout: i64,
    pub total_household_payout: i64,
    pub members_met_quota: i32,
    pub config: PayoutConfig,
}

/// Per-member line of a closure report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberWeekReport {
    pub member_id: String,
    pub display_name: String,
    /// Effective totals per resource type: archived originals for settled
    /// entries, live quantities otherwise. Each entry counts exactly once.
    pub totals: HashMap<ResourceType, i64>,
    pub payout: PayoutBreakdown,
}

/// The reconciliation report produced by closing (or previewing) a week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClosureReport {
    pub week: FarmWeek,
    pub closed: bool,
    pub closed_by: Option<String>,
    pub closed_at: Option<NaiveDateTime>,
    pub config: PayoutConfig,
    /// Every active member, including those with zero farm activity,
    /// sorted by display name.
    pub members: Vec<MemberWeekReport>,
    pub total_members: i32,
    pub total_dirty_money: i64,
    pub total_member_payout: i64,
    pub total_household_payout: i64,
    pub members_met_quota: i32,
    /// Ledger rows actually settled by this invocation; zero on a pure
    /// re-closure or preview.
    pub entries_settled: usize,
}
