//! Domain models for the local per-user configuration document.
//!
//! The document is a single JSON object shared with the rest of the platform
//! (dashboard layout, notification settings and so on). The routing engine only
//! owns the `channelRoutes` key and leaves every other key untouched.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::server::model::route::RouteMapping;

/// Document key holding every guild's channel routes.
pub const CHANNEL_ROUTES_KEY: &str = "channelRoutes";

/// A guild's routes as stored in the local configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredGuildRoutes {
    pub mapping: RouteMapping,
    pub updated_at: DateTime<Utc>,
}

/// Local configuration document for a single user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserConfig {
    /// Discord id of the owning user.
    pub user_id: u64,
    /// The whole configuration document.
    pub document: Map<String, Value>,
    /// Timestamp when the document was last written.
    pub updated_at: DateTime<Utc>,
}

impl UserConfig {
    /// Creates an empty document for a user that has never saved anything.
    pub fn empty(user_id: u64) -> Self {
        Self {
            user_id,
            document: Map::new(),
            updated_at: Utc::now(),
        }
    }

    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The database entity model to convert
    ///
    /// # Returns
    /// - `Ok(UserConfig)` - Successfully converted domain model
    /// - `Err(DbErr::Custom)` - User id is not numeric or the document is not a JSON object
    pub fn from_entity(entity: entity::user_config::Model) -> Result<Self, DbErr> {
        let user_id = entity
            .user_id
            .parse::<u64>()
            .map_err(|e| DbErr::Custom(format!("Failed to parse user_id: {}", e)))?;

        let document: Value = serde_json::from_str(&entity.document)
            .map_err(|e| DbErr::Custom(format!("Failed to parse user config document: {}", e)))?;

        let Value::Object(document) = document else {
            return Err(DbErr::Custom(format!(
                "User config document for user {} is not a JSON object",
                user_id
            )));
        };

        Ok(Self {
            user_id,
            document,
            updated_at: entity.updated_at,
        })
    }

    /// Reads the stored routes for a guild.
    ///
    /// A malformed guild entry is logged and treated as absent so a corrupted
    /// fallback copy never blocks loading.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild id
    ///
    /// # Returns
    /// - `Some(StoredGuildRoutes)` - Guild has stored routes
    /// - `None` - No entry, or the entry could not be parsed
    pub fn guild_routes(&self, guild_id: u64) -> Option<StoredGuildRoutes> {
        let entry = self
            .document
            .get(CHANNEL_ROUTES_KEY)?
            .as_object()?
            .get(&guild_id.to_string())?;

        match serde_json::from_value::<StoredGuildRoutes>(entry.clone()) {
            Ok(mut routes) => {
                routes.mapping.retain(|_, path| !path.is_empty());
                Some(routes)
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring malformed local routes for user {} guild {}: {}",
                    self.user_id,
                    guild_id,
                    e
                );
                None
            }
        }
    }

    /// Replaces the stored routes for a guild.
    ///
    /// Creates the `channelRoutes` object when missing or when it holds a
    /// non-object value. Entries of other guilds are preserved.
    pub fn set_guild_routes(&mut self, guild_id: u64, routes: StoredGuildRoutes) {
        let entry = self
            .document
            .entry(CHANNEL_ROUTES_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }

        if let Value::Object(guilds) = entry {
            guilds.insert(
                guild_id.to_string(),
                serde_json::json!({
                    "mapping": routes.mapping,
                    "updatedAt": routes.updated_at,
                }),
            );
        }
    }

    /// Serializes the whole document for storage.
    pub fn document_payload(&self) -> String {
        Value::Object(self.document.clone()).to_string()
    }
}
