//! Database models for members.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use faction_core::members::{Member, NewMember};

/// Database model for members
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
#[diesel(table_name = crate::schema::members)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct MemberDB {
    pub id: String,
    pub external_account_id: String,
    pub display_name: String,
    pub in_game_id: Option<String>,
    pub phone: Option<String>,
    pub recruiter: Option<String>,
    pub rank: Option<String>,
    pub active: bool,
    pub registered_at: NaiveDateTime,
}

/// Database model for registering a new member
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::members)]
#[serde(rename_all = "camelCase")]
pub struct NewMemberDB {
    pub id: Option<String>,
    pub external_account_id: String,
    pub display_name: String,
    pub in_game_id: Option<String>,
    pub phone: Option<String>,
    pub recruiter: Option<String>,
    pub rank: Option<String>,
    pub active: bool,
    pub registered_at: NaiveDateTime,
}

// Conversion to domain models
impl From<MemberDB> for Member {
    fn from(db: MemberDB) -> Self {
        Self {
            id: db.id,
            external_account_id: db.external_account_id,
            display_name: db.display_name,
            in_game_id: db.in_game_id,
            phone: db.phone,
            recruiter: db.recruiter,
            rank: db.rank,
            active: db.active,
            registered_at: db.registered_at,
        }
    }
}

impl From<NewMember> for NewMemberDB {
    fn from(domain: NewMember) -> Self {
        Self {
            id: domain.id,
            external_account_id: domain.external_account_id,
            display_name: domain.display_name,
            in_game_id: domain.in_game_id,
            phone: domain.phone,
            recruiter: domain.recruiter,
            rank: domain.rank,
            active: true,
            registered_at: chrono::Utc::now().naive_utc(),
        }
    }
}
