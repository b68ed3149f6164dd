//! ISO-8601 farm week identification.
//!
//! All weekly ledger rows and closures are keyed by an ISO week number plus
//! its ISO year. The ISO year is the year of the week's Thursday, which is
//! not always the calendar year of the date itself (late December / early
//! January dates cross over).

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// A (week number, ISO year) pair identifying one farm week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmWeek {
    /// ISO week number, 1..=53.
    pub week: u32,
    /// ISO year of the week (year of the week's Thursday).
    pub year: i32,
}

impl FarmWeek {
    /// Validated constructor for externally supplied week/year pairs.
    pub fn new(week: u32, year: i32) -> Result<Self> {
        if !(1..=53).contains(&week) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Week number {} is out of range 1..=53",
                week
            ))));
        }
        Ok(FarmWeek { week, year })
    }

    /// The ISO week a given date falls in.
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        FarmWeek {
            week: iso.week(),
            year: iso.year(),
        }
    }

    /// The ISO week of today (UTC).
    pub fn current() -> Self {
        Self::of(Utc::now().date_naive())
    }
}

impl std::fmt::Display for FarmWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "week {} of {}", self.week, self.year)
    }
}
