use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use faction_core::closure::{ClosureRepositoryTrait, NewWeeklyClosure, WeeklyClosure};
use faction_core::farm::RESOURCE_TYPE_DIRTY_MONEY;
use faction_core::week::FarmWeek;
use faction_core::Result;

use super::model::{NewWeeklyClosureDB, WeeklyClosureDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{farm_entries, weekly_closures};

/// Repository for weekly closure records and the settle-and-close
/// transaction.
pub struct ClosureRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ClosureRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ClosureRepository { pool, writer }
    }
}

#[async_trait]
impl ClosureRepositoryTrait for ClosureRepository {
    fn get_closure(&self, week: FarmWeek) -> Result<Option<WeeklyClosure>> {
        let mut conn = get_connection(&self.pool)?;
        let closure_db = weekly_closures::table
            .filter(weekly_closures::week_number.eq(week.week as i32))
            .filter(weekly_closures::year.eq(week.year))
            .select(WeeklyClosureDB::as_select())
            .first::<WeeklyClosureDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        closure_db.map(WeeklyClosureDB::into_domain).transpose()
    }

    fn list_closures(&self) -> Result<Vec<WeeklyClosure>> {
        let mut conn = get_connection(&self.pool)?;
        let closures_db = weekly_closures::table
            .select(WeeklyClosureDB::as_select())
            .order((weekly_closures::year.desc(), weekly_closures::week_number.desc()))
            .load::<WeeklyClosureDB>(&mut conn)
            .map_err(StorageError::from)?;
        closures_db
            .into_iter()
            .map(WeeklyClosureDB::into_domain)
            .collect()
    }

    async fn finalize_week(&self, closure: NewWeeklyClosure) -> Result<(WeeklyClosure, usize)> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<(WeeklyClosure, usize)> {
                    let now = Utc::now().naive_utc();
                    let week_number = closure.week.week as i32;
                    let year = closure.week.year;

                    // Settle the week's dirty money. Per-row compare-and-swap
                    // on settled=false: rows taken by an earlier (possibly
                    // crashed) attempt are skipped, and the assignments read
                    // the pre-update row so quantity_original is written
                    // exactly once.
                    let settled = diesel::update(
                        farm_entries::table
                            .filter(farm_entries::week_number.eq(week_number))
                            .filter(farm_entries::year.eq(year))
                            .filter(farm_entries::resource_type.eq(RESOURCE_TYPE_DIRTY_MONEY))
                            .filter(farm_entries::settled.eq(false)),
                    )
                    .set((
                        farm_entries::quantity_original.eq(farm_entries::quantity.nullable()),
                        farm_entries::quantity.eq(0),
                        farm_entries::settled.eq(true),
                        farm_entries::settled_at.eq(now),
                        farm_entries::settled_by.eq(&closure.closed_by),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                    // Upsert the closure record. An existing row keeps its
                    // original closed_by/closed_at; only the recomputed
                    // totals and config are refreshed.
                    let existing = weekly_closures::table
                        .filter(weekly_closures::week_number.eq(week_number))
                        .filter(weekly_closures::year.eq(year))
                        .select(WeeklyClosureDB::as_select())
                        .first::<WeeklyClosureDB>(conn)
                        .optional()
                        .map_err(StorageError::from)?;

                    let stored = match existing {
                        Some(row) => diesel::update(weekly_closures::table.find(&row.id))
                            .set((
                                weekly_closures::closed.eq(true),
                                weekly_closures::total_members.eq(closure.total_members),
                                weekly_closures::total_dirty_money.eq(closure.total_dirty_money),
                                weekly_closures::total_member_payout
                                    .eq(closure.total_member_payout),
                                weekly_closures::total_household_payout
                                    .eq(closure.total_household_payout),
                                weekly_closures::members_met_quota.eq(closure.members_met_quota),
                                weekly_closures::quota.eq(closure.config.quota),
                                weekly_closures::laundering_fraction
                                    .eq(closure.config.laundering_fraction.to_string()),
                                weekly_closures::member_share
                                    .eq(closure.config.member_share.to_string()),
                                weekly_closures::household_share
                                    .eq(closure.config.household_share.to_string()),
                            ))
                            .returning(WeeklyClosureDB::as_returning())
                            .get_result::<WeeklyClosureDB>(conn)
                            .map_err(StorageError::from)?,
                        None => {
                            let new_row = NewWeeklyClosureDB::from_domain(
                                Uuid::new_v4().to_string(),
                                now,
                                &closure,
                            );
                            diesel::insert_into(weekly_closures::table)
                                .values(&new_row)
                                .returning(WeeklyClosureDB::as_returning())
                                .get_result::<WeeklyClosureDB>(conn)
                                .map_err(StorageError::from)?
                        }
                    };

                    Ok((stored.into_domain()?, settled))
                },
            )
            .await
    }
}
