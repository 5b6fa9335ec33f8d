//! User configuration repository for the local persistence fallback.
//!
//! Each user owns one configuration document. Reads and writes always move the
//! whole document; callers edit the parts they own and write it back.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

use crate::server::model::user_config::UserConfig;

/// Repository providing database operations for user configuration documents.
pub struct UserConfigRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserConfigRepository<'a> {
    /// Creates a new UserConfigRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the primary database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the configuration document for a user.
    ///
    /// # Returns
    /// - `Ok(Some(UserConfig))` - User has a stored document
    /// - `Ok(None)` - User has never saved a document
    /// - `Err(DbErr)` - Database error, or the stored document is not a JSON object
    pub async fn get_by_user_id(&self, user_id: u64) -> Result<Option<UserConfig>, DbErr> {
        let entity = self.find_entity(user_id).await?;

        entity.map(UserConfig::from_entity).transpose()
    }

    /// Creates or replaces a user's configuration document.
    ///
    /// # Arguments
    /// - `config` - The whole document to store
    ///
    /// # Returns
    /// - `Ok(UserConfig)` - The stored document with a fresh `updated_at`
    /// - `Err(DbErr)` - Database error during upsert
    pub async fn upsert(&self, config: UserConfig) -> Result<UserConfig, DbErr> {
        let existing = self.find_entity(config.user_id).await?;

        let now = Utc::now();
        let document = config.document_payload();

        let entity = if let Some(existing) = existing {
            let active = entity::user_config::ActiveModel {
                id: ActiveValue::Set(existing.id),
                user_id: ActiveValue::Set(existing.user_id),
                document: ActiveValue::Set(document),
                updated_at: ActiveValue::Set(now),
            };
            active.update(self.db).await?
        } else {
            let new_record = entity::user_config::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(config.user_id.to_string()),
                document: ActiveValue::Set(document),
                updated_at: ActiveValue::Set(now),
            };
            new_record.insert(self.db).await?
        };

        UserConfig::from_entity(entity)
    }

    async fn find_entity(
        &self,
        user_id: u64,
    ) -> Result<Option<entity::user_config::Model>, DbErr> {
        entity::prelude::UserConfig::find()
            .filter(entity::user_config::Column::UserId.eq(user_id.to_string()))
            .one(self.db)
            .await
    }
}
