//! Working mappings for every guild a user has opened during the session.
//!
//! Exactly one guild is active at a time. Switching the active guild swaps the
//! working mapping but never discards another guild's unsaved edits; each guild
//! keeps its own draft, dirty flag and last-saved snapshot.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::server::{
    error::routing::RoutingError, model::route::RouteMapping, service::route::path,
};

/// Path change produced by a single-field write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathChange {
    pub before: String,
    pub after: String,
}

/// Draft state of one guild's mapping.
#[derive(Debug, Clone, Default)]
struct GuildDraft {
    /// Working mapping, normalized, without empty paths.
    mapping: RouteMapping,
    /// Mapping as of the last successful load or save; the rollback target.
    last_saved: RouteMapping,
    dirty: bool,
    /// Timestamp of the last persisted copy, if one is known.
    updated_at: Option<DateTime<Utc>>,
}

/// Multi-guild cache of working mappings.
#[derive(Debug, Default)]
pub struct MappingStore {
    active: Option<u64>,
    guilds: HashMap<u64, GuildDraft>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected guild, if any.
    pub fn active_guild(&self) -> Option<u64> {
        self.active
    }

    /// Whether the guild has a draft in the cache.
    pub fn contains(&self, guild_id: u64) -> bool {
        self.guilds.contains_key(&guild_id)
    }

    /// Inserts a freshly loaded mapping for a guild and makes it active.
    ///
    /// The loaded mapping becomes both the working copy and the rollback target.
    /// Paths are normalized and empty entries dropped before storage.
    pub fn insert_loaded(
        &mut self,
        guild_id: u64,
        mapping: RouteMapping,
        updated_at: Option<DateTime<Utc>>,
    ) {
        let mapping = normalize_mapping(mapping);

        self.guilds.insert(
            guild_id,
            GuildDraft {
                last_saved: mapping.clone(),
                mapping,
                dirty: false,
                updated_at,
            },
        );
        self.active = Some(guild_id);
    }

    /// Makes a cached guild active.
    ///
    /// # Returns
    /// - `Ok(())` - Guild is now active, with its own draft and dirty state
    /// - `Err(RoutingError::GuildNotLoaded)` - Guild was never loaded this session
    pub fn switch_to(&mut self, guild_id: u64) -> Result<(), RoutingError> {
        if !self.guilds.contains_key(&guild_id) {
            return Err(RoutingError::GuildNotLoaded(guild_id));
        }

        self.active = Some(guild_id);
        Ok(())
    }

    /// Path for a channel in the active guild, empty when unset.
    pub fn get(&self, channel_id: &str) -> String {
        self.active_draft()
            .and_then(|draft| draft.mapping.get(channel_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Stores a normalized path for a channel in the active guild and marks it dirty.
    pub fn set(&mut self, channel_id: &str, input: &str) -> Result<Option<PathChange>, RoutingError> {
        let guild_id = self.active.ok_or(RoutingError::NoGuildSelected)?;
        self.set_in(guild_id, channel_id, input)
    }

    /// Stores a normalized path for a channel of a specific cached guild.
    ///
    /// An empty path removes the entry. The guild is marked dirty even when the
    /// value does not change.
    ///
    /// # Returns
    /// - `Ok(Some(PathChange))` - Stored value changed
    /// - `Ok(None)` - Stored value was already equal
    /// - `Err(RoutingError::GuildNotLoaded)` - Guild is not in the cache
    pub fn set_in(
        &mut self,
        guild_id: u64,
        channel_id: &str,
        input: &str,
    ) -> Result<Option<PathChange>, RoutingError> {
        let draft = self
            .guilds
            .get_mut(&guild_id)
            .ok_or(RoutingError::GuildNotLoaded(guild_id))?;

        let after = path::normalize(input);
        let previous = if after.is_empty() {
            draft.mapping.remove(channel_id)
        } else {
            draft.mapping.insert(channel_id.to_string(), after.clone())
        };
        let before = previous.unwrap_or_default();

        draft.dirty = true;

        Ok((before != after).then_some(PathChange { before, after }))
    }

    /// Clears a channel's path in the active guild. Equivalent to `set(channel_id, "")`.
    pub fn clear(&mut self, channel_id: &str) -> Result<Option<PathChange>, RoutingError> {
        self.set(channel_id, "")
    }

    /// Immutable copy of the active guild's working mapping.
    pub fn snapshot(&self) -> RouteMapping {
        self.active_draft()
            .map(|draft| draft.mapping.clone())
            .unwrap_or_default()
    }

    /// Replaces the active guild's working mapping wholesale and marks it clean.
    pub fn restore(&mut self, snapshot: RouteMapping) -> Result<(), RoutingError> {
        let draft = self.active_draft_mut()?;
        draft.mapping = normalize_mapping(snapshot);
        draft.dirty = false;
        Ok(())
    }

    /// Last successfully loaded or saved mapping of the active guild.
    pub fn last_saved(&self) -> RouteMapping {
        self.active_draft()
            .map(|draft| draft.last_saved.clone())
            .unwrap_or_default()
    }

    /// Records a successful save of `mapping` for a guild.
    ///
    /// The saved mapping becomes the rollback target. The guild is only marked
    /// clean when its working copy still equals what was saved.
    pub fn mark_saved(&mut self, guild_id: u64, mapping: RouteMapping, updated_at: DateTime<Utc>) {
        if let Some(draft) = self.guilds.get_mut(&guild_id) {
            draft.dirty = draft.mapping != mapping;
            draft.last_saved = mapping;
            draft.updated_at = Some(updated_at);
        }
    }

    /// Whether the active guild has unsaved edits.
    pub fn is_dirty(&self) -> bool {
        self.active_draft().is_some_and(|draft| draft.dirty)
    }

    /// Every cached guild with unsaved edits, in ascending id order.
    pub fn dirty_guilds(&self) -> Vec<u64> {
        let mut guilds: Vec<u64> = self
            .guilds
            .iter()
            .filter(|(_, draft)| draft.dirty)
            .map(|(guild_id, _)| *guild_id)
            .collect();
        guilds.sort_unstable();
        guilds
    }

    /// Timestamp of the active guild's last persisted copy.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.active_draft().and_then(|draft| draft.updated_at)
    }

    fn active_draft(&self) -> Option<&GuildDraft> {
        self.active.and_then(|guild_id| self.guilds.get(&guild_id))
    }

    fn active_draft_mut(&mut self) -> Result<&mut GuildDraft, RoutingError> {
        let guild_id = self.active.ok_or(RoutingError::NoGuildSelected)?;
        self.guilds
            .get_mut(&guild_id)
            .ok_or(RoutingError::GuildNotLoaded(guild_id))
    }
}

/// Normalizes every path in a mapping and drops entries that end up empty.
pub fn normalize_mapping(mapping: RouteMapping) -> RouteMapping {
    mapping
        .into_iter()
        .map(|(channel_id, input)| (channel_id, path::normalize(&input)))
        .filter(|(_, path)| !path.is_empty())
        .collect()
}
