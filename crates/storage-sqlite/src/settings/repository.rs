use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use faction_core::settings::SettingsRepositoryTrait;
use faction_core::Result;

use super::model::AppSettingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_settings;

pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_setting(&self, setting_key: &str) -> Result<String> {
        let mut conn = get_connection(&self.pool)?;
        let value = app_settings::table
            .find(setting_key)
            .select(app_settings::setting_value)
            .first::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(value)
    }

    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()> {
        let row = AppSettingDB {
            setting_key: setting_key.to_string(),
            setting_value: setting_value.to_string(),
            updated_at: chrono::Utc::now().naive_utc(),
        };
        self.writer
            .exec(move |conn| {
                diesel::replace_into(app_settings::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
