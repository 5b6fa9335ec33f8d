//! Channel route mapping repository for the remote routing store.
//!
//! This module provides the `RouteMappingRepository` for reading and writing the
//! remote copy of a user's channel routes for a guild. Records are keyed by the
//! (user, guild) pair; every write overwrites the whole mapping and stamps the
//! current time. The repository converts between entity models and domain models
//! at the infrastructure boundary.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

use crate::server::model::route_mapping::{SyncRecord, UpsertRouteMappingParam};

/// Repository providing database operations for remote route mappings.
pub struct RouteMappingRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RouteMappingRepository<'a> {
    /// Creates a new RouteMappingRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the remote database connection
    ///
    /// # Returns
    /// - `RouteMappingRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the stored mapping for a user's guild.
    ///
    /// # Arguments
    /// - `user_id` - Discord id of the owning user
    /// - `guild_id` - Discord id of the guild
    ///
    /// # Returns
    /// - `Ok(Some(SyncRecord))` - A mapping has been saved for this pair
    /// - `Ok(None)` - Nothing has been saved for this pair yet
    /// - `Err(DbErr)` - Database error during query or a malformed stored payload
    pub async fn find_by_user_and_guild(
        &self,
        user_id: u64,
        guild_id: u64,
    ) -> Result<Option<SyncRecord>, DbErr> {
        let entity = self.find_entity(user_id, guild_id).await?;

        entity.map(SyncRecord::from_entity).transpose()
    }

    /// Creates or overwrites the mapping for a user's guild.
    ///
    /// Last write wins: an existing record is replaced without any version check.
    /// The `updated_at` timestamp is set to the current time.
    ///
    /// # Arguments
    /// - `param` - Owning user, guild and the full mapping to store
    ///
    /// # Returns
    /// - `Ok(SyncRecord)` - The stored record
    /// - `Err(DbErr)` - Database error during upsert
    pub async fn upsert(&self, param: UpsertRouteMappingParam) -> Result<SyncRecord, DbErr> {
        let existing = self.find_entity(param.user_id, param.guild_id).await?;

        let now = Utc::now();
        let payload = param.payload();

        let entity = if let Some(existing) = existing {
            let active = entity::channel_route_mapping::ActiveModel {
                id: ActiveValue::Set(existing.id),
                user_id: ActiveValue::Set(existing.user_id),
                guild_id: ActiveValue::Set(existing.guild_id),
                mapping: ActiveValue::Set(payload),
                updated_at: ActiveValue::Set(now),
            };
            active.update(self.db).await?
        } else {
            let new_record = entity::channel_route_mapping::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(param.user_id.to_string()),
                guild_id: ActiveValue::Set(param.guild_id.to_string()),
                mapping: ActiveValue::Set(payload),
                updated_at: ActiveValue::Set(now),
            };
            new_record.insert(self.db).await?
        };

        SyncRecord::from_entity(entity)
    }

    async fn find_entity(
        &self,
        user_id: u64,
        guild_id: u64,
    ) -> Result<Option<entity::channel_route_mapping::Model>, DbErr> {
        entity::prelude::ChannelRouteMapping::find()
            .filter(entity::channel_route_mapping::Column::UserId.eq(user_id.to_string()))
            .filter(entity::channel_route_mapping::Column::GuildId.eq(guild_id.to_string()))
            .one(self.db)
            .await
    }
}
