use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use faction_core::errors::{DatabaseError, Error};
use faction_core::farm::{FarmEntry, FarmRepositoryTrait, NewFarmEntry};
use faction_core::week::FarmWeek;
use faction_core::Result;

use super::model::{FarmEntryDB, NewFarmEntryDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::farm_entries;

/// Repository for the append-only farm ledger.
pub struct FarmRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FarmRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        FarmRepository { pool, writer }
    }
}

#[async_trait]
impl FarmRepositoryTrait for FarmRepository {
    fn get_entry(&self, entry_id: &str) -> Result<FarmEntry> {
        let mut conn = get_connection(&self.pool)?;
        let entry_db = farm_entries::table
            .find(entry_id)
            .select(FarmEntryDB::as_select())
            .first::<FarmEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        entry_db.into_domain()
    }

    fn entries_for_week(&self, week: FarmWeek) -> Result<Vec<FarmEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let entries_db = farm_entries::table
            .filter(farm_entries::week_number.eq(week.week as i32))
            .filter(farm_entries::year.eq(week.year))
            .select(FarmEntryDB::as_select())
            .order(farm_entries::recorded_at.asc())
            .load::<FarmEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        entries_db
            .into_iter()
            .map(FarmEntryDB::into_domain)
            .collect()
    }

    fn entries_for_member_week(&self, member_id: &str, week: FarmWeek) -> Result<Vec<FarmEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let entries_db = farm_entries::table
            .filter(farm_entries::member_id.eq(member_id))
            .filter(farm_entries::week_number.eq(week.week as i32))
            .filter(farm_entries::year.eq(week.year))
            .select(FarmEntryDB::as_select())
            .order(farm_entries::recorded_at.asc())
            .load::<FarmEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        entries_db
            .into_iter()
            .map(FarmEntryDB::into_domain)
            .collect()
    }

    async fn insert_entry(&self, new_entry: NewFarmEntry) -> Result<FarmEntry> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FarmEntry> {
                let mut new_entry_db: NewFarmEntryDB = new_entry.into();
                if new_entry_db.id.is_none() {
                    new_entry_db.id = Some(Uuid::new_v4().to_string());
                }

                let result_db = diesel::insert_into(farm_entries::table)
                    .values(&new_entry_db)
                    .returning(FarmEntryDB::as_returning())
                    .get_result::<FarmEntryDB>(conn)
                    .map_err(StorageError::from)?;
                result_db.into_domain()
            })
            .await
    }

    async fn settle_entry(&self, entry_id: &str, settled_by: &str) -> Result<bool> {
        let entry_id = entry_id.to_string();
        let settled_by = settled_by.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                // Compare-and-swap on settled: the assignments read the
                // pre-update row, so quantity_original captures the live
                // quantity exactly once, and a lost race touches nothing.
                let affected = diesel::update(
                    farm_entries::table
                        .find(&entry_id)
                        .filter(farm_entries::settled.eq(false)),
                )
                .set((
                    farm_entries::quantity_original.eq(farm_entries::quantity.nullable()),
                    farm_entries::quantity.eq(0),
                    farm_entries::settled.eq(true),
                    farm_entries::settled_at.eq(Utc::now().naive_utc()),
                    farm_entries::settled_by.eq(&settled_by),
                ))
                .execute(conn)
                .map_err(StorageError::from)?;

                if affected > 0 {
                    return Ok(true);
                }

                // Zero rows: distinguish "already settled" from "no such entry".
                let exists = farm_entries::table
                    .find(&entry_id)
                    .count()
                    .get_result::<i64>(conn)
                    .map_err(StorageError::from)?;
                if exists == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "Farm entry {} not found",
                        entry_id
                    ))));
                }
                Ok(false)
            })
            .await
    }
}
