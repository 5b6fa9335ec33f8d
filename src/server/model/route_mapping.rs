//! Domain models for the remote channel route mapping record.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde_json::Value;

use crate::server::model::route::RouteMapping;

/// Remote copy of a mapping, keyed by (user, guild).
///
/// The record is the remote source of truth for a guild's routes. It may be
/// absent entirely when the remote store is not configured.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncRecord {
    /// Discord id of the owning user.
    pub user_id: u64,
    /// Discord id of the guild the mapping belongs to.
    pub guild_id: u64,
    /// Channel id → path snapshot as last written.
    pub mapping: RouteMapping,
    /// Timestamp of the last write, surfaced to users for situational awareness.
    pub updated_at: DateTime<Utc>,
}

impl SyncRecord {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// The stored mapping must be a flat JSON object whose values are all strings.
    ///
    /// # Arguments
    /// - `entity` - The database entity model to convert
    ///
    /// # Returns
    /// - `Ok(SyncRecord)` - Successfully converted domain model
    /// - `Err(DbErr::Custom)` - Ids are not numeric or the payload is not a flat string object
    pub fn from_entity(entity: entity::channel_route_mapping::Model) -> Result<Self, DbErr> {
        let user_id = entity
            .user_id
            .parse::<u64>()
            .map_err(|e| DbErr::Custom(format!("Failed to parse user_id: {}", e)))?;

        let guild_id = entity
            .guild_id
            .parse::<u64>()
            .map_err(|e| DbErr::Custom(format!("Failed to parse guild_id: {}", e)))?;

        let mapping = parse_mapping_payload(&entity.mapping)?;

        Ok(Self {
            user_id,
            guild_id,
            mapping,
            updated_at: entity.updated_at,
        })
    }
}

/// Parses a stored mapping payload into a route mapping.
///
/// Empty path values are dropped since an empty path means "unset".
fn parse_mapping_payload(payload: &str) -> Result<RouteMapping, DbErr> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| DbErr::Custom(format!("Failed to parse route mapping payload: {}", e)))?;

    let Value::Object(entries) = value else {
        return Err(DbErr::Custom(
            "Route mapping payload is not a JSON object".to_string(),
        ));
    };

    let mut mapping = RouteMapping::new();
    for (channel_id, path) in entries {
        let Value::String(path) = path else {
            return Err(DbErr::Custom(format!(
                "Route mapping path for channel {} is not a string",
                channel_id
            )));
        };

        if !path.is_empty() {
            mapping.insert(channel_id, path);
        }
    }

    Ok(mapping)
}

/// Parameters for upserting the remote copy of a mapping.
///
/// The repository stamps the current time on every upsert.
#[derive(Debug, Clone)]
pub struct UpsertRouteMappingParam {
    pub user_id: u64,
    pub guild_id: u64,
    pub mapping: RouteMapping,
}

impl UpsertRouteMappingParam {
    /// Serializes the mapping into the flat JSON object payload stored remotely.
    pub fn payload(&self) -> String {
        Value::Object(
            self.mapping
                .iter()
                .map(|(channel_id, path)| (channel_id.clone(), Value::String(path.clone())))
                .collect(),
        )
        .to_string()
    }
}
