//! Domain models for channel route configuration.
//!
//! A guild's routing configuration is a dictionary from Discord channel id to an
//! application route path. These types are shared by the routing engine, the
//! reconciler and the repositories.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serenity::all::{ChannelType, GuildChannel};

use crate::model::route::{AuditEntryDto, ChannelDto, ChannelKindDto};

/// Channel id → route path for a single (user, guild) pair.
///
/// Serialized in key order so snapshots compare and persist deterministically.
/// Entries with an empty path are never stored.
pub type RouteMapping = BTreeMap<String, String>;

/// Kind of channel a path can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Announcement,
    Forum,
    Voice,
}

impl ChannelKind {
    /// Maps a Discord channel type onto a routable kind.
    ///
    /// # Returns
    /// - `Some(ChannelKind)` - Channel type can carry a route
    /// - `None` - Categories, threads, stage channels and other kinds are not routable
    pub fn from_channel_type(kind: ChannelType) -> Option<Self> {
        match kind {
            ChannelType::Text => Some(Self::Text),
            ChannelType::News => Some(Self::Announcement),
            ChannelType::Forum => Some(Self::Forum),
            ChannelType::Voice => Some(Self::Voice),
            _ => None,
        }
    }

    pub fn into_dto(self) -> ChannelKindDto {
        match self {
            Self::Text => ChannelKindDto::Text,
            Self::Announcement => ChannelKindDto::Announcement,
            Self::Forum => ChannelKindDto::Forum,
            Self::Voice => ChannelKindDto::Voice,
        }
    }
}

/// Channel sourced from the channel directory.
///
/// Immutable from the routing engine's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Opaque channel identifier assigned by Discord.
    pub id: String,
    /// Display name as shown in Discord, possibly prefixed with `#`.
    pub name: String,
    pub kind: Option<ChannelKind>,
    /// Parent category id, if the channel is nested in a category.
    pub parent_id: Option<String>,
}

impl Channel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: None,
            parent_id: None,
        }
    }

    /// Converts a Serenity guild channel into a routable channel.
    ///
    /// # Returns
    /// - `Some(Channel)` - Channel is text, announcement, forum or voice
    /// - `None` - Channel kind cannot carry a route
    pub fn from_guild_channel(channel: &GuildChannel) -> Option<Self> {
        let kind = ChannelKind::from_channel_type(channel.kind)?;

        Some(Self {
            id: channel.id.get().to_string(),
            name: channel.name.clone(),
            kind: Some(kind),
            parent_id: channel.parent_id.map(|id| id.get().to_string()),
        })
    }

    pub fn into_dto(self) -> ChannelDto {
        ChannelDto {
            id: self.id,
            name: self.name,
            kind: self.kind.map(ChannelKind::into_dto),
            parent_id: self.parent_id,
        }
    }
}

/// Change to a single channel's path, recorded for the session audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub guild_id: u64,
    pub channel_id: String,
    pub before: String,
    pub after: String,
    pub at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn into_dto(self) -> AuditEntryDto {
        AuditEntryDto {
            guild_id: self.guild_id.to_string(),
            channel_id: self.channel_id,
            before: self.before,
            after: self.after,
            at: self.at,
        }
    }
}
