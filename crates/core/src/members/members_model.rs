//! Member domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Domain model representing a faction member.
///
/// Members are never hard-deleted; `active` is flipped off instead so that
/// historical ledger rows keep a valid owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    /// Chat-platform account id; unique across members.
    pub external_account_id: String,
    pub display_name: String,
    /// Character id inside the game world.
    pub in_game_id: Option<String>,
    /// In-game phone number.
    pub phone: Option<String>,
    /// Display name of the member who recruited this one.
    pub recruiter: Option<String>,
    pub rank: Option<String>,
    pub active: bool,
    pub registered_at: NaiveDateTime,
}

/// Input model for registering a new member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub external_account_id: String,
    pub display_name: String,
    pub in_game_id: Option<String>,
    pub phone: Option<String>,
    pub recruiter: Option<String>,
    pub rank: Option<String>,
}

impl NewMember {
    /// Validates the registration data.
    pub fn validate(&self) -> Result<()> {
        if self.external_account_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "externalAccountId".to_string(),
            )));
        }
        if self.display_name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Member name cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}
