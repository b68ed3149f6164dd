//! Database models for farm ledger entries.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use faction_core::farm::{FarmEntry, NewFarmEntry, ResourceType};
use faction_core::week::FarmWeek;
use faction_core::Result;

use crate::members::MemberDB;

/// Database model for farm ledger entries
#[derive(
    Queryable,
    Identifiable,
    Associations,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(MemberDB, foreign_key = member_id))]
#[diesel(table_name = crate::schema::farm_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct FarmEntryDB {
    pub id: String,
    pub member_id: String,
    pub resource_type: String,
    pub week_number: i32,
    pub year: i32,
    pub quantity: i64,
    pub quantity_original: Option<i64>,
    pub settled: bool,
    pub settled_at: Option<NaiveDateTime>,
    pub settled_by: Option<String>,
    pub recorded_at: NaiveDateTime,
}

impl FarmEntryDB {
    /// Converts into the domain model. The resource type column holds one of
    /// the canonical strings; anything else is surfaced as a validation
    /// error rather than silently mapped to a settling/non-settling type.
    pub fn into_domain(self) -> Result<FarmEntry> {
        Ok(FarmEntry {
            resource_type: ResourceType::from_str(&self.resource_type)?,
            week: FarmWeek {
                week: self.week_number as u32,
                year: self.year,
            },
            id: self.id,
            member_id: self.member_id,
            quantity: self.quantity,
            quantity_original: self.quantity_original,
            settled: self.settled,
            settled_at: self.settled_at,
            settled_by: self.settled_by,
            recorded_at: self.recorded_at,
        })
    }
}

/// Database model for recording a new farm entry
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::farm_entries)]
#[serde(rename_all = "camelCase")]
pub struct NewFarmEntryDB {
    pub id: Option<String>,
    pub member_id: String,
    pub resource_type: String,
    pub week_number: i32,
    pub year: i32,
    pub quantity: i64,
    pub settled: bool,
    pub recorded_at: NaiveDateTime,
}

impl From<NewFarmEntry> for NewFarmEntryDB {
    fn from(domain: NewFarmEntry) -> Self {
        Self {
            id: domain.id,
            member_id: domain.member_id,
            resource_type: domain.resource_type.as_str().to_string(),
            week_number: domain.week.week as i32,
            year: domain.week.year,
            quantity: domain.quantity,
            settled: false,
            recorded_at: chrono::Utc::now().naive_utc(),
        }
    }
}
