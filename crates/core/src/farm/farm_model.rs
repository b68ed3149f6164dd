//! Farm ledger domain models.

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::farm_constants::{
    MAX_FARM_QUANTITY, RESOURCE_TYPE_BATTERY, RESOURCE_TYPE_CIRCUIT_BOARD,
    RESOURCE_TYPE_DIRTY_MONEY,
};
use crate::errors::{Error, Result, ValidationError};
use crate::week::FarmWeek;

/// Resource types tracked by the weekly farm ledger.
///
/// Only [`ResourceType::DirtyMoney`] participates in payout computation and
/// week-closure settlement; the other types accumulate for reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    DirtyMoney,
    Battery,
    CircuitBoard,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::DirtyMoney => RESOURCE_TYPE_DIRTY_MONEY,
            ResourceType::Battery => RESOURCE_TYPE_BATTERY,
            ResourceType::CircuitBoard => RESOURCE_TYPE_CIRCUIT_BOARD,
        }
    }

    /// All tracked resource types, in display order.
    pub fn all() -> [ResourceType; 3] {
        [
            ResourceType::DirtyMoney,
            ResourceType::Battery,
            ResourceType::CircuitBoard,
        ]
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            RESOURCE_TYPE_DIRTY_MONEY => Ok(ResourceType::DirtyMoney),
            RESOURCE_TYPE_BATTERY => Ok(ResourceType::Battery),
            RESOURCE_TYPE_CIRCUIT_BOARD => Ok(ResourceType::CircuitBoard),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown resource type: {}",
                other
            )))),
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accumulation record: a discrete farming event by a member in a week.
///
/// Entries are an additive event log - multiple rows per
/// (member, week, resource type) are expected and summed, never merged.
/// Settlement zeroes `quantity` after copying it into `quantity_original`;
/// entries are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FarmEntry {
    pub id: String,
    pub member_id: String,
    pub resource_type: ResourceType,
    pub week: FarmWeek,
    /// Current/active amount; zero once settled.
    pub quantity: i64,
    /// Snapshot taken at settlement time; set exactly once.
    pub quantity_original: Option<i64>,
    pub settled: bool,
    pub settled_at: Option<NaiveDateTime>,
    pub settled_by: Option<String>,
    pub recorded_at: NaiveDateTime,
}

impl FarmEntry {
    /// The amount this entry contributes regardless of settlement state:
    /// the archived original once settled, the live quantity otherwise.
    /// Counts each entry exactly once, so summing it over a week never
    /// double-counts.
    pub fn effective_quantity(&self) -> i64 {
        if self.settled {
            self.quantity_original.unwrap_or(0)
        } else {
            self.quantity
        }
    }
}

/// Input model for recording a new farm event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFarmEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub member_id: String,
    pub resource_type: ResourceType,
    pub week: FarmWeek,
    pub quantity: i64,
}

impl NewFarmEntry {
    /// Validates the recorded quantity.
    pub fn validate(&self) -> Result<()> {
        if self.member_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "memberId".to_string(),
            )));
        }
        if self.quantity <= 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Farm quantity must be positive, got {}",
                self.quantity
            ))));
        }
        if self.quantity > MAX_FARM_QUANTITY {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Farm quantity {} exceeds the ceiling of {}",
                self.quantity, MAX_FARM_QUANTITY
            ))));
        }
        Ok(())
    }
}
