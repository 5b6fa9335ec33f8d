//! Routing editor orchestrating a user's channel route configuration.
//!
//! The editor owns the multi-guild `MappingStore`, the channel lists it was
//! loaded with, the session audit log and the user's `SyncReconciler`. Every
//! mutation acts on the active guild, except debounced edits which target the
//! guild captured when the edit was queued.
//!
//! Saving runs path validation and conflict detection over the whole mapping.
//! Rejected saves return the offending channel ids as data and leave the draft
//! dirty; accepted saves are written locally before the remote store is tried.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    model::route::{EditorStateDto, GuildRoutesDto, RouteRowDto, SaveRejectionDto},
    server::{
        error::{routing::RoutingError, AppError},
        model::route::{AuditEntry, Channel, RouteMapping},
        service::route::{
            bulk::{self, RouteUpdate},
            conflict, path,
            store::{MappingStore, PathChange},
            sync::{RemoteDispatch, RemoteLoad, SyncReconciler, SyncStatus},
        },
    },
};

/// Number of audit entries retained per editor; older entries are dropped first.
pub const AUDIT_LOG_LIMIT: usize = 500;

/// Lifecycle state of the active guild's draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Clean,
    Dirty,
    Validating,
}

impl EditorState {
    pub fn into_dto(self) -> EditorStateDto {
        match self {
            Self::Clean => EditorStateDto::Clean,
            Self::Dirty => EditorStateDto::Dirty,
            Self::Validating => EditorStateDto::Validating,
        }
    }
}

/// Channels that would block a save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Channels whose path fails syntax validation, in id order.
    pub invalid_channel_ids: Vec<String>,
    /// Channels sharing a path with another channel, in id order.
    pub duplicate_channel_ids: Vec<String>,
    /// Paths assigned to more than one channel.
    pub duplicate_paths: Vec<String>,
}

impl ValidationReport {
    /// Whether the report prevents saving under the given overlap setting.
    pub fn blocks_save(&self, allow_overlap: bool) -> bool {
        !self.invalid_channel_ids.is_empty()
            || (!allow_overlap && !self.duplicate_channel_ids.is_empty())
    }

    pub fn into_dto(self) -> SaveRejectionDto {
        SaveRejectionDto {
            invalid_channel_ids: self.invalid_channel_ids,
            duplicate_channel_ids: self.duplicate_channel_ids,
            duplicate_paths: self.duplicate_paths,
        }
    }
}

/// One channel of the active guild with its path and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRow {
    pub channel: Channel,
    pub path: String,
    pub invalid: bool,
    pub duplicate: bool,
}

impl RouteRow {
    pub fn into_dto(self) -> RouteRowDto {
        RouteRowDto {
            channel: self.channel.into_dto(),
            path: self.path,
            invalid: self.invalid,
            duplicate: self.duplicate,
        }
    }
}

/// Full view of the active guild's routes.
#[derive(Debug, Clone)]
pub struct GuildRoutes {
    pub guild_id: u64,
    pub state: EditorState,
    pub sync: SyncStatus,
    pub updated_at: Option<DateTime<Utc>>,
    pub allow_overlap: bool,
    pub rows: Vec<RouteRow>,
    pub mapping: RouteMapping,
    pub report: ValidationReport,
}

impl GuildRoutes {
    pub fn into_dto(self) -> GuildRoutesDto {
        GuildRoutesDto {
            guild_id: self.guild_id.to_string(),
            state: self.state.into_dto(),
            sync: self.sync.into_dto(),
            updated_at: self.updated_at,
            allow_overlap: self.allow_overlap,
            rows: self.rows.into_iter().map(RouteRow::into_dto).collect(),
            mapping: self.mapping,
            invalid_channel_ids: self.report.invalid_channel_ids,
            duplicate_channel_ids: self.report.duplicate_channel_ids,
            duplicate_paths: self.report.duplicate_paths,
        }
    }
}

/// A save that was committed to local persistence.
#[derive(Debug)]
pub struct SavedMapping {
    /// Guild captured when the save started.
    pub guild_id: u64,
    /// Timestamp of the local write.
    pub updated_at: DateTime<Utc>,
    /// Remote save started after the local write.
    pub remote: RemoteDispatch,
}

/// Result of a save attempt.
#[derive(Debug)]
pub enum SaveOutcome {
    /// Validation or conflict detection blocked the save; nothing was written.
    Rejected(ValidationReport),
    Saved(SavedMapping),
}

/// Keeps an editor in the `Validating` state until dropped.
///
/// Resets the flag even when the save future is dropped part way through.
struct ValidatingGuard(Arc<AtomicBool>);

impl ValidatingGuard {
    fn raise(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag.clone())
    }
}

impl Drop for ValidatingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Per-user routing editor.
pub struct RoutingEditor {
    user_id: u64,
    store: MappingStore,
    channels: HashMap<u64, Vec<Channel>>,
    audit: VecDeque<AuditEntry>,
    allow_overlap: bool,
    validating: Arc<AtomicBool>,
    reconciler: SyncReconciler,
    last_activity: Instant,
}

impl RoutingEditor {
    /// Creates an editor with no guild selected.
    ///
    /// # Arguments
    /// - `user_id` - Discord id of the user owning the editor
    /// - `reconciler` - Persistence for this user's mappings
    pub fn new(user_id: u64, reconciler: SyncReconciler) -> Self {
        Self {
            user_id,
            store: MappingStore::new(),
            channels: HashMap::new(),
            audit: VecDeque::new(),
            allow_overlap: false,
            validating: Arc::new(AtomicBool::new(false)),
            reconciler,
            last_activity: Instant::now(),
        }
    }

    pub fn active_guild(&self) -> Option<u64> {
        self.store.active_guild()
    }

    /// Whether the guild was loaded into the editor during this session.
    pub fn is_loaded(&self, guild_id: u64) -> bool {
        self.store.contains(guild_id)
    }

    /// Selects a guild, loading its mapping when it is not cached yet.
    ///
    /// A cached guild is switched to without any I/O and keeps its unsaved edits;
    /// the channel list is refreshed. An uncached guild is read from local
    /// persistence first, then from the remote store. A remote copy replaces the
    /// local one; a missing, unavailable or failing remote store keeps the local
    /// copy.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild id
    /// - `channels` - The guild's routable channels
    ///
    /// # Returns
    /// - `Ok(())` - Guild is active
    /// - `Err(AppError::DbErr)` - Local configuration document could not be read
    pub async fn select_guild(
        &mut self,
        guild_id: u64,
        channels: Vec<Channel>,
    ) -> Result<(), AppError> {
        self.touch();
        self.channels.insert(guild_id, channels);

        if self.store.contains(guild_id) {
            self.store.switch_to(guild_id)?;
            return Ok(());
        }

        let local = self.reconciler.load_local(self.user_id, guild_id).await?;

        let (mapping, updated_at) = match self.reconciler.load(self.user_id, guild_id).await {
            RemoteLoad::Loaded(record) => (record.mapping, Some(record.updated_at)),
            RemoteLoad::Off | RemoteLoad::NotFound | RemoteLoad::Failed(_) => local
                .map(|routes| (routes.mapping, Some(routes.updated_at)))
                .unwrap_or_default(),
        };

        tracing::debug!(
            "Loaded {} routes for user {} guild {}",
            mapping.len(),
            self.user_id,
            guild_id
        );

        self.store.insert_loaded(guild_id, mapping, updated_at);
        Ok(())
    }

    /// Makes a previously loaded guild active.
    ///
    /// # Returns
    /// - `Ok(())` - Guild is active
    /// - `Err(RoutingError::GuildNotLoaded)` - Guild must be selected first
    pub fn ensure_active(&mut self, guild_id: u64) -> Result<(), RoutingError> {
        self.touch();
        if self.store.active_guild() == Some(guild_id) {
            return Ok(());
        }
        self.store.switch_to(guild_id)
    }

    /// Path assigned to a channel of the active guild, empty when unset.
    pub fn get(&self, channel_id: &str) -> String {
        self.store.get(channel_id)
    }

    /// Assigns a path to a channel of the active guild.
    pub fn set(&mut self, channel_id: &str, input: &str) -> Result<(), RoutingError> {
        let guild_id = self.require_active()?;
        self.write(guild_id, channel_id, input)
    }

    /// Removes a channel's path in the active guild.
    pub fn clear(&mut self, channel_id: &str) -> Result<(), RoutingError> {
        self.set(channel_id, "")
    }

    /// Applies a debounced single-field edit to the guild it was made in.
    pub fn apply_debounced(
        &mut self,
        guild_id: u64,
        channel_id: &str,
        input: &str,
    ) -> Result<(), RoutingError> {
        self.write(guild_id, channel_id, input)
    }

    /// Assigns `prefix + slug(name)` to each selected channel.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of channels updated
    /// - `Err(RoutingError::UnknownChannels)` - A selected id is not in the channel list; nothing changes
    pub fn apply_prefix(
        &mut self,
        channel_ids: &[String],
        prefix: &str,
    ) -> Result<usize, RoutingError> {
        let guild_id = self.require_active()?;
        let updates = bulk::prefix_updates(self.channels_of(guild_id), channel_ids, prefix)?;

        self.apply_updates(guild_id, updates)
    }

    /// Assigns templated paths to every channel whose name matches `pattern`.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of channels matched and updated
    /// - `Err(RoutingError::InvalidPattern)` - Pattern is empty
    pub fn apply_pattern(&mut self, pattern: &str, template: &str) -> Result<usize, RoutingError> {
        let guild_id = self.require_active()?;
        let updates = bulk::pattern_updates(self.channels_of(guild_id), pattern, template)?;

        self.apply_updates(guild_id, updates)
    }

    /// Merges a JSON object of channel id → path into the active guild.
    ///
    /// The payload is parsed and checked completely before any entry is
    /// applied. Entries are written through `set`, so paths are normalized and an
    /// empty string clears the channel.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of entries applied
    /// - `Err(RoutingError::MalformedImport)` - Payload is not a flat object of strings
    pub fn import_json(&mut self, payload: &str) -> Result<usize, RoutingError> {
        let guild_id = self.require_active()?;

        let value: Value = serde_json::from_str(payload)
            .map_err(|e| RoutingError::MalformedImport(e.to_string()))?;

        let Value::Object(entries) = value else {
            return Err(RoutingError::MalformedImport(
                "expected a JSON object of channel ids to paths".to_string(),
            ));
        };

        let mut updates = Vec::with_capacity(entries.len());
        for (channel_id, path) in entries {
            let Value::String(path) = path else {
                return Err(RoutingError::MalformedImport(format!(
                    "path for channel {} is not a string",
                    channel_id
                )));
            };
            updates.push(RouteUpdate { channel_id, path });
        }

        self.apply_updates(guild_id, updates)
    }

    /// Active guild's working mapping as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, RoutingError> {
        self.require_active()?;

        let value = Value::Object(
            self.store
                .snapshot()
                .into_iter()
                .map(|(channel_id, path)| (channel_id, Value::String(path)))
                .collect(),
        );

        Ok(format!("{:#}", value))
    }

    pub fn allow_overlap(&self) -> bool {
        self.allow_overlap
    }

    /// Sets whether duplicate paths are allowed to be saved.
    pub fn set_allow_overlap(&mut self, allow_overlap: bool) {
        self.touch();
        self.allow_overlap = allow_overlap;
    }

    /// Validation and conflict results over the active guild's working mapping.
    ///
    /// Duplicates are always reported, even when overlap is allowed.
    pub fn validation_report(&self) -> ValidationReport {
        let mapping = self.store.snapshot();

        let invalid_channel_ids = mapping
            .iter()
            .filter(|(_, path)| !path::validate(path))
            .map(|(channel_id, _)| channel_id.clone())
            .collect();

        ValidationReport {
            invalid_channel_ids,
            duplicate_channel_ids: conflict::duplicate_channels(&mapping).into_iter().collect(),
            duplicate_paths: conflict::find_duplicates(&mapping).into_iter().collect(),
        }
    }

    /// One row per channel of the active guild, in channel list order.
    pub fn rows(&self) -> Result<Vec<RouteRow>, RoutingError> {
        let guild_id = self.require_active()?;
        let mapping = self.store.snapshot();
        let duplicates = conflict::duplicate_channels(&mapping);

        let rows = self
            .channels_of(guild_id)
            .iter()
            .map(|channel| {
                let route = mapping.get(&channel.id).cloned().unwrap_or_default();
                RouteRow {
                    invalid: !path::validate(&route),
                    duplicate: duplicates.contains(&channel.id),
                    channel: channel.clone(),
                    path: route,
                }
            })
            .collect();

        Ok(rows)
    }

    /// Full view of the active guild for display.
    pub async fn guild_routes(&self) -> Result<GuildRoutes, RoutingError> {
        let guild_id = self.require_active()?;

        Ok(GuildRoutes {
            guild_id,
            state: self.state(),
            sync: self.reconciler.status().await,
            updated_at: self.store.updated_at(),
            allow_overlap: self.allow_overlap,
            rows: self.rows()?,
            mapping: self.store.snapshot(),
            report: self.validation_report(),
        })
    }

    /// Saves the active guild's mapping.
    ///
    /// Nothing is written when any path is invalid, or when paths are shared
    /// and overlap is not allowed. Otherwise the mapping is written to the local
    /// configuration document, the draft is marked saved and the remote save is
    /// dispatched in the background for the guild captured here.
    ///
    /// # Returns
    /// - `Ok(SaveOutcome::Rejected)` - Offending channels; draft stays dirty
    /// - `Ok(SaveOutcome::Saved)` - Local write succeeded
    /// - `Err(AppError)` - No guild selected, or the local write failed
    pub async fn save(&mut self) -> Result<SaveOutcome, AppError> {
        let guild_id = self.require_active()?;
        self.touch();

        let _validating = ValidatingGuard::raise(&self.validating);
        self.commit(guild_id).await
    }

    /// Discards unsaved edits of the active guild, restoring the last loaded or
    /// saved mapping.
    pub fn rollback_to_last_saved(&mut self) -> Result<(), RoutingError> {
        self.require_active()?;
        self.touch();

        let last_saved = self.store.last_saved();
        self.store.restore(last_saved)
    }

    pub fn state(&self) -> EditorState {
        if self.validating.load(Ordering::Acquire) {
            EditorState::Validating
        } else if self.store.is_dirty() {
            EditorState::Dirty
        } else {
            EditorState::Clean
        }
    }

    /// Immutable copy of the active guild's working mapping.
    pub fn snapshot(&self) -> RouteMapping {
        self.store.snapshot()
    }

    /// Every loaded guild with unsaved edits.
    pub fn dirty_guilds(&self) -> Vec<u64> {
        self.store.dirty_guilds()
    }

    /// Path changes made during this session, oldest first.
    pub fn audit_log(&self) -> &VecDeque<AuditEntry> {
        &self.audit
    }

    pub async fn sync_status(&self) -> SyncStatus {
        self.reconciler.status().await
    }

    /// When the editor was last used.
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    async fn commit(&mut self, guild_id: u64) -> Result<SaveOutcome, AppError> {
        let report = self.validation_report();
        if report.blocks_save(self.allow_overlap) {
            tracing::debug!(
                "Rejected save for user {} guild {}: {} invalid, {} duplicate",
                self.user_id,
                guild_id,
                report.invalid_channel_ids.len(),
                report.duplicate_channel_ids.len()
            );
            return Ok(SaveOutcome::Rejected(report));
        }

        let mapping = self.store.snapshot();
        let updated_at = self
            .reconciler
            .save_local(self.user_id, guild_id, mapping.clone())
            .await?;

        self.store.mark_saved(guild_id, mapping.clone(), updated_at);

        tracing::info!(
            "Saved {} routes for user {} guild {}",
            mapping.len(),
            self.user_id,
            guild_id
        );

        let remote = self.reconciler.dispatch_save(self.user_id, guild_id, mapping);

        Ok(SaveOutcome::Saved(SavedMapping {
            guild_id,
            updated_at,
            remote,
        }))
    }

    fn apply_updates(
        &mut self,
        guild_id: u64,
        updates: Vec<RouteUpdate>,
    ) -> Result<usize, RoutingError> {
        let count = updates.len();
        for update in updates {
            self.write(guild_id, &update.channel_id, &update.path)?;
        }
        Ok(count)
    }

    fn write(&mut self, guild_id: u64, channel_id: &str, input: &str) -> Result<(), RoutingError> {
        self.touch();

        if let Some(change) = self.store.set_in(guild_id, channel_id, input)? {
            self.record(guild_id, channel_id, change);
        }
        Ok(())
    }

    fn record(&mut self, guild_id: u64, channel_id: &str, change: PathChange) {
        if self.audit.len() >= AUDIT_LOG_LIMIT {
            self.audit.pop_front();
        }

        self.audit.push_back(AuditEntry {
            guild_id,
            channel_id: channel_id.to_string(),
            before: change.before,
            after: change.after,
            at: Utc::now(),
        });
    }

    fn channels_of(&self, guild_id: u64) -> &[Channel] {
        self.channels
            .get(&guild_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn require_active(&self) -> Result<u64, RoutingError> {
        self.store
            .active_guild()
            .ok_or(RoutingError::NoGuildSelected)
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}
