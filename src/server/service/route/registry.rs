//! Application-level registry of routing editors, one per user.
//!
//! The registry is shared through `AppState` and replaces any process-global
//! editor state. It also owns the debouncer for single-field edits so pending
//! edits can be flushed before a save or inspected by the navigation guard.

use std::{collections::HashMap, sync::Arc, time::Duration};

use sea_orm::DatabaseConnection;
use tokio::sync::{Mutex, RwLock};

use crate::server::{
    error::routing::RoutingError,
    service::route::{editor::RoutingEditor, sync::SyncReconciler},
    util::debounce::Debouncer,
};

/// Debounce key: (user, guild, channel).
type EditKey = (u64, u64, String);

/// Shared handle to a user's editor.
pub type SharedEditor = Arc<Mutex<RoutingEditor>>;

/// Registry of per-user routing editors.
#[derive(Clone)]
pub struct EditorRegistry {
    local: DatabaseConnection,
    remote: Option<DatabaseConnection>,
    editors: Arc<RwLock<HashMap<u64, SharedEditor>>>,
    edits: Debouncer<EditKey, String>,
}

impl EditorRegistry {
    /// Creates an empty registry.
    ///
    /// # Arguments
    /// - `local` - Primary database holding user configuration documents
    /// - `remote` - Remote routing store, `None` when not configured
    /// - `debounce` - Quiet period before a single-field edit is applied
    pub fn new(
        local: DatabaseConnection,
        remote: Option<DatabaseConnection>,
        debounce: Duration,
    ) -> Self {
        Self {
            local,
            remote,
            editors: Arc::new(RwLock::new(HashMap::new())),
            edits: Debouncer::new(debounce),
        }
    }

    /// Gets the user's editor, creating it on first use.
    pub async fn editor(&self, user_id: u64) -> SharedEditor {
        if let Some(editor) = self.editors.read().await.get(&user_id) {
            return editor.clone();
        }

        self.editors
            .write()
            .await
            .entry(user_id)
            .or_insert_with(|| {
                let reconciler = SyncReconciler::new(self.local.clone(), self.remote.clone());
                Arc::new(Mutex::new(RoutingEditor::new(user_id, reconciler)))
            })
            .clone()
    }

    /// Gets the user's editor only if one exists.
    pub async fn existing(&self, user_id: u64) -> Option<SharedEditor> {
        self.editors.read().await.get(&user_id).cloned()
    }

    /// Queues a single-field edit for a loaded guild.
    ///
    /// Rapid edits to the same channel are coalesced; only the last value is
    /// applied once the debounce delay passes without another edit.
    ///
    /// # Returns
    /// - `Ok(())` - Edit queued
    /// - `Err(RoutingError::GuildNotLoaded)` - Guild has not been selected this session
    pub async fn queue_edit(
        &self,
        user_id: u64,
        guild_id: u64,
        channel_id: String,
        path: String,
    ) -> Result<(), RoutingError> {
        let editor = self.editor(user_id).await;
        editor.lock().await.ensure_active(guild_id)?;

        let registry = self.clone();
        self.edits
            .push(
                (user_id, guild_id, channel_id),
                path,
                move |key, path| async move {
                    registry.apply_edit(key, path).await;
                },
            )
            .await;

        Ok(())
    }

    /// Applies the user's pending edits immediately.
    ///
    /// Called before saving, exporting or reading the mapping so debouncing never
    /// changes what those operations observe.
    ///
    /// # Returns
    /// - Number of edits applied
    pub async fn flush_edits(&self, user_id: u64) -> usize {
        let pending = self
            .edits
            .drain_matching(|(user, _, _)| *user == user_id)
            .await;

        let count = pending.len();
        for (key, path) in pending {
            self.apply_edit(key, path).await;
        }
        count
    }

    /// Number of the user's edits still waiting for their debounce delay.
    pub async fn pending_edits(&self, user_id: u64) -> usize {
        self.edits
            .pending_matching(|(user, _, _)| *user == user_id)
            .await
    }

    /// Drops editors that have been idle too long.
    ///
    /// Clean editors are dropped after `clean_ttl`. Editors holding unsaved edits
    /// are kept for `dirty_ttl`. Editors that are in use or still have pending
    /// edits are never dropped.
    ///
    /// # Returns
    /// - Number of editors dropped
    pub async fn evict_idle(&self, clean_ttl: Duration, dirty_ttl: Duration) -> usize {
        let mut editors = self.editors.write().await;
        let mut evicted = Vec::new();

        for (user_id, editor) in editors.iter() {
            let Ok(editor) = editor.try_lock() else {
                continue;
            };

            let ttl = if editor.dirty_guilds().is_empty() {
                clean_ttl
            } else {
                dirty_ttl
            };

            if editor.last_activity().elapsed() >= ttl {
                evicted.push(*user_id);
            }
        }

        let mut count = 0;
        for user_id in evicted {
            if self.pending_edits(user_id).await > 0 {
                continue;
            }
            if editors.remove(&user_id).is_some() {
                count += 1;
            }
        }

        count
    }

    /// Number of live editors.
    pub async fn len(&self) -> usize {
        self.editors.read().await.len()
    }

    async fn apply_edit(&self, (user_id, guild_id, channel_id): EditKey, path: String) {
        let Some(editor) = self.existing(user_id).await else {
            tracing::debug!(
                "Dropping edit for channel {} of evicted editor {}",
                channel_id,
                user_id
            );
            return;
        };

        if let Err(e) = editor
            .lock()
            .await
            .apply_debounced(guild_id, &channel_id, &path)
        {
            tracing::warn!(
                "Failed to apply edit for user {} channel {}: {}",
                user_id,
                channel_id,
                e
            );
        };
    }
}
