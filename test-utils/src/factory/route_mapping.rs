//! Channel route mapping factory for creating remote routing records.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use serde_json::{Map, Value};

/// Factory for creating test channel route mapping records.
///
/// Defaults to an empty mapping for a fresh (user, guild) pair stamped with the
/// current time.
///
/// # Example
///
/// ```rust,ignore
/// let record = RouteMappingFactory::new(&db)
///     .user_id("42")
///     .guild_id("1001")
///     .route("c1", "/x")
///     .build()
///     .await?;
/// ```
pub struct RouteMappingFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: String,
    guild_id: String,
    mapping: Map<String, Value>,
    updated_at: DateTime<Utc>,
}

impl<'a> RouteMappingFactory<'a> {
    /// Creates a new RouteMappingFactory with default values.
    ///
    /// Defaults:
    /// - user_id / guild_id: unique auto-incremented ids
    /// - mapping: `{}`
    /// - updated_at: now
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            user_id: next_id().to_string(),
            guild_id: next_id().to_string(),
            mapping: Map::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    /// Adds one channel → path entry to the stored mapping.
    pub fn route(mut self, channel_id: impl Into<String>, path: impl Into<String>) -> Self {
        self.mapping
            .insert(channel_id.into(), Value::String(path.into()));
        self
    }

    /// Stores a raw mapping payload, bypassing the flat string object shape.
    ///
    /// Used to seed malformed remote records.
    pub fn raw_mapping(mut self, mapping: Map<String, Value>) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Builds and inserts the record into the database.
    ///
    /// # Returns
    /// - `Ok(entity::channel_route_mapping::Model)` - Created record
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::channel_route_mapping::Model, DbErr> {
        entity::channel_route_mapping::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(self.user_id),
            guild_id: ActiveValue::Set(self.guild_id),
            mapping: ActiveValue::Set(Value::Object(self.mapping).to_string()),
            updated_at: ActiveValue::Set(self.updated_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a route mapping record with default values.
///
/// Shorthand for `RouteMappingFactory::new(db).build().await`.
pub async fn create_route_mapping(
    db: &DatabaseConnection,
) -> Result<entity::channel_route_mapping::Model, DbErr> {
    RouteMappingFactory::new(db).build().await
}
