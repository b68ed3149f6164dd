//! Database models for weekly closures.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use faction_core::closure::{NewWeeklyClosure, WeeklyClosure};
use faction_core::errors::{Error, ValidationError};
use faction_core::payout::PayoutConfig;
use faction_core::week::FarmWeek;
use faction_core::Result;

/// Database model for weekly closures
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::weekly_closures)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct WeeklyClosureDB {
    pub id: String,
    pub week_number: i32,
    pub year: i32,
    pub closed: bool,
    pub closed_by: String,
    pub closed_at: NaiveDateTime,
    pub total_members: i32,
    pub total_dirty_money: i64,
    pub total_member_payout: i64,
    pub total_household_payout: i64,
    pub members_met_quota: i32,
    pub quota: i64,
    pub laundering_fraction: String,
    pub member_share: String,
    pub household_share: String,
}

fn parse_share(column: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "Closure column {} holds an invalid decimal '{}': {}",
            column, raw, e
        )))
    })
}

impl WeeklyClosureDB {
    /// Converts into the domain model. The captured payout fractions are
    /// stored as text; corrupt values are surfaced instead of silently
    /// replaced, because a re-closure would recompute different payouts.
    pub fn into_domain(self) -> Result<WeeklyClosure> {
        Ok(WeeklyClosure {
            config: PayoutConfig {
                quota: self.quota,
                laundering_fraction: parse_share("laundering_fraction", &self.laundering_fraction)?,
                member_share: parse_share("member_share", &self.member_share)?,
                household_share: parse_share("household_share", &self.household_share)?,
            },
            week: FarmWeek {
                week: self.week_number as u32,
                year: self.year,
            },
            id: self.id,
            closed: self.closed,
            closed_by: self.closed_by,
            closed_at: self.closed_at,
            total_members: self.total_members,
            total_dirty_money: self.total_dirty_money,
            total_member_payout: self.total_member_payout,
            total_household_payout: self.total_household_payout,
            members_met_quota: self.members_met_quota,
        })
    }
}

/// Database model for inserting a closure record
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::weekly_closures)]
#[serde(rename_all = "camelCase")]
pub struct NewWeeklyClosureDB {
    pub id: String,
    pub week_number: i32,
    pub year: i32,
    pub closed: bool,
    pub closed_by: String,
    pub closed_at: NaiveDateTime,
    pub total_members: i32,
    pub total_dirty_money: i64,
    pub total_member_payout: i64,
    pub total_household_payout: i64,
    pub members_met_quota: i32,
    pub quota: i64,
    pub laundering_fraction: String,
    pub member_share: String,
    pub household_share: String,
}

impl NewWeeklyClosureDB {
    pub fn from_domain(id: String, closed_at: NaiveDateTime, domain: &NewWeeklyClosure) -> Self {
        Self {
            id,
            week_number: domain.week.week as i32,
            year: domain.week.year,
            closed: true,
            closed_by: domain.closed_by.clone(),
            closed_at,
            total_members: domain.total_members,
            total_dirty_money: domain.total_dirty_money,
            total_member_payout: domain.total_member_payout,
            total_household_payout: domain.total_household_payout,
            members_met_quota: domain.members_met_quota,
            quota: domain.config.quota,
            laundering_fraction: domain.config.laundering_fraction.to_string(),
            member_share: domain.config.member_share.to_string(),
            household_share: domain.config.household_share.to_string(),
        }
    }
}
