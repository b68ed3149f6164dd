use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use faction_core::members::{Member, MemberRepositoryTrait, NewMember};
use faction_core::Result;

use super::model::{MemberDB, NewMemberDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::members;

pub struct MemberRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MemberRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        MemberRepository { pool, writer }
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemberRepository {
    fn get_member(&self, member_id: &str) -> Result<Member> {
        let mut conn = get_connection(&self.pool)?;
        let member_db = members::table
            .find(member_id)
            .select(MemberDB::as_select())
            .first::<MemberDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Member::from(member_db))
    }

    fn get_by_external_account(&self, external_account_id: &str) -> Result<Member> {
        let mut conn = get_connection(&self.pool)?;
        let member_db = members::table
            .filter(members::external_account_id.eq(external_account_id))
            .select(MemberDB::as_select())
            .first::<MemberDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Member::from(member_db))
    }

    fn list_members(&self, active_filter: Option<bool>) -> Result<Vec<Member>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = members::table
            .select(MemberDB::as_select())
            .into_boxed();
        if let Some(active) = active_filter {
            query = query.filter(members::active.eq(active));
        }
        let members_db = query
            .order(members::display_name.asc())
            .load::<MemberDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(members_db.into_iter().map(Member::from).collect())
    }

    async fn create_member(&self, new_member: NewMember) -> Result<Member> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Member> {
                let mut new_member_db: NewMemberDB = new_member.into();
                if new_member_db.id.is_none() {
                    new_member_db.id = Some(Uuid::new_v4().to_string());
                }

                let result_db = diesel::insert_into(members::table)
                    .values(&new_member_db)
                    .returning(MemberDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Member::from(result_db))
            })
            .await
    }

    async fn set_active(&self, member_id: &str, active: bool) -> Result<Member> {
        let member_id = member_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Member> {
                let result_db = diesel::update(members::table.find(&member_id))
                    .set(members::active.eq(active))
                    .returning(MemberDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Member::from(result_db))
            })
            .await
    }
}
