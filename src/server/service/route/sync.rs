//! Reconciliation between the local configuration document and the remote
//! routing store.
//!
//! Persistence is local-first. A save always writes the user's local document
//! before the remote store is attempted, and a remote failure never undoes the
//! local write. The remote store is optional; when it is not configured the
//! reconciler stays `Off` for the lifetime of the process and every operation
//! runs purely on local persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};
use tokio::{sync::RwLock, task::JoinHandle};

use crate::{
    model::route::SyncStatusDto,
    server::{
        data::{route_mapping::RouteMappingRepository, user_config::UserConfigRepository},
        model::{
            route::RouteMapping,
            route_mapping::{SyncRecord, UpsertRouteMappingParam},
            user_config::{StoredGuildRoutes, UserConfig},
        },
    },
};

/// Remote synchronization state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// No remote store is configured. Terminal.
    Off,
    Loading,
    Saving,
    /// Last remote operation succeeded.
    Ready {
        /// Timestamp of the remote copy, when one is known to exist.
        updated_at: Option<DateTime<Utc>>,
    },
    /// Last remote operation failed. Local data is unaffected.
    Error { reason: String },
}

impl SyncStatus {
    pub fn into_dto(self) -> SyncStatusDto {
        match self {
            Self::Off => SyncStatusDto::Off,
            Self::Loading => SyncStatusDto::Loading,
            Self::Saving => SyncStatusDto::Saving,
            Self::Ready { updated_at } => SyncStatusDto::Ready { updated_at },
            Self::Error { reason } => SyncStatusDto::Error { reason },
        }
    }
}

/// Outcome of reading a guild's mapping from the remote store.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteLoad {
    Off,
    NotFound,
    Loaded(SyncRecord),
    Failed(String),
}

/// Outcome of writing a guild's mapping to the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteSave {
    Off,
    Saved(DateTime<Utc>),
    Failed(String),
}

/// Handle to a remote save started after a successful local save.
#[derive(Debug)]
pub enum RemoteDispatch {
    /// Nothing was dispatched; the remote store is not configured.
    Off,
    /// Remote save running in the background.
    Pending(JoinHandle<RemoteSave>),
}

/// Local and remote persistence for one user's routing mappings.
///
/// Cloning is cheap; clones share the same status so a detached remote save
/// reports back to the editor that dispatched it.
#[derive(Clone)]
pub struct SyncReconciler {
    local: DatabaseConnection,
    remote: Option<DatabaseConnection>,
    status: Arc<RwLock<SyncStatus>>,
}

impl SyncReconciler {
    /// Creates a reconciler over the primary database and an optional remote store.
    ///
    /// # Arguments
    /// - `local` - Primary database holding user configuration documents
    /// - `remote` - Remote routing store connection, `None` when not configured
    ///
    /// # Returns
    /// - `SyncReconciler` - Starts `Ready` without a known remote timestamp, or `Off`
    pub fn new(local: DatabaseConnection, remote: Option<DatabaseConnection>) -> Self {
        let status = if remote.is_some() {
            SyncStatus::Ready { updated_at: None }
        } else {
            SyncStatus::Off
        };

        Self {
            local,
            remote,
            status: Arc::new(RwLock::new(status)),
        }
    }

    /// Current remote synchronization state.
    pub async fn status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    /// Reads a guild's mapping from the remote store.
    ///
    /// Remote errors are converted into `RemoteLoad::Failed` and reflected in the
    /// status; they are never returned as errors.
    ///
    /// # Arguments
    /// - `user_id` - Discord id of the owning user
    /// - `guild_id` - Discord id of the guild
    ///
    /// # Returns
    /// - `RemoteLoad::Off` - Remote store not configured
    /// - `RemoteLoad::NotFound` - Remote store has no copy for this guild
    /// - `RemoteLoad::Loaded` - Remote copy with its timestamp
    /// - `RemoteLoad::Failed` - Remote store could not be read
    pub async fn load(&self, user_id: u64, guild_id: u64) -> RemoteLoad {
        let Some(remote) = &self.remote else {
            return RemoteLoad::Off;
        };

        self.set_status(SyncStatus::Loading).await;

        let result = RouteMappingRepository::new(remote)
            .find_by_user_and_guild(user_id, guild_id)
            .await;

        match result {
            Ok(Some(record)) => {
                self.set_status(SyncStatus::Ready {
                    updated_at: Some(record.updated_at),
                })
                .await;
                RemoteLoad::Loaded(record)
            }
            Ok(None) => {
                self.set_status(SyncStatus::Ready { updated_at: None }).await;
                RemoteLoad::NotFound
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load remote routes for user {} guild {}: {}",
                    user_id,
                    guild_id,
                    e
                );
                let reason = e.to_string();
                self.set_status(SyncStatus::Error {
                    reason: reason.clone(),
                })
                .await;
                RemoteLoad::Failed(reason)
            }
        }
    }

    /// Writes a guild's full mapping to the remote store, overwriting any
    /// existing copy.
    ///
    /// # Returns
    /// - `RemoteSave::Off` - Remote store not configured
    /// - `RemoteSave::Saved` - Remote copy written at the returned time
    /// - `RemoteSave::Failed` - Remote write failed; local data is unaffected
    pub async fn save(&self, user_id: u64, guild_id: u64, mapping: RouteMapping) -> RemoteSave {
        let Some(remote) = &self.remote else {
            return RemoteSave::Off;
        };

        self.set_status(SyncStatus::Saving).await;

        let result = RouteMappingRepository::new(remote)
            .upsert(UpsertRouteMappingParam {
                user_id,
                guild_id,
                mapping,
            })
            .await;

        match result {
            Ok(record) => {
                tracing::debug!(
                    "Saved remote routes for user {} guild {}",
                    user_id,
                    guild_id
                );
                self.set_status(SyncStatus::Ready {
                    updated_at: Some(record.updated_at),
                })
                .await;
                RemoteSave::Saved(record.updated_at)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to save remote routes for user {} guild {}: {}",
                    user_id,
                    guild_id,
                    e
                );
                let reason = e.to_string();
                self.set_status(SyncStatus::Error {
                    reason: reason.clone(),
                })
                .await;
                RemoteSave::Failed(reason)
            }
        }
    }

    /// Starts a remote save in the background.
    ///
    /// The guild id and mapping are captured now, so the save targets the guild
    /// that was saved even if the user switches guilds before it completes.
    pub fn dispatch_save(&self, user_id: u64, guild_id: u64, mapping: RouteMapping) -> RemoteDispatch {
        if self.remote.is_none() {
            return RemoteDispatch::Off;
        }

        let reconciler = self.clone();
        let handle =
            tokio::spawn(async move { reconciler.save(user_id, guild_id, mapping).await });

        RemoteDispatch::Pending(handle)
    }

    /// Reads a guild's routes from the user's local configuration document.
    ///
    /// A document that cannot be parsed is logged and read as absent, the same
    /// way a malformed guild entry is, so the remote copy can still be used.
    ///
    /// # Returns
    /// - `Ok(Some(StoredGuildRoutes))` - Guild has locally saved routes
    /// - `Ok(None)` - No document, no usable entry for this guild, or a malformed document
    /// - `Err(DbErr)` - Database error reading the document
    pub async fn load_local(
        &self,
        user_id: u64,
        guild_id: u64,
    ) -> Result<Option<StoredGuildRoutes>, DbErr> {
        let config = match UserConfigRepository::new(&self.local)
            .get_by_user_id(user_id)
            .await
        {
            Ok(config) => config,
            Err(DbErr::Custom(reason)) => {
                tracing::warn!(
                    "Ignoring malformed local config for user {}: {}",
                    user_id,
                    reason
                );
                None
            }
            Err(e) => return Err(e),
        };

        Ok(config.and_then(|config| config.guild_routes(guild_id)))
    }

    /// Writes a guild's routes into the user's local configuration document.
    ///
    /// Other guilds' entries and every key the routing engine does not own are
    /// preserved.
    ///
    /// # Returns
    /// - `Ok(DateTime<Utc>)` - Timestamp recorded with the guild's entry
    /// - `Err(DbErr)` - Database error reading or writing the document
    pub async fn save_local(
        &self,
        user_id: u64,
        guild_id: u64,
        mapping: RouteMapping,
    ) -> Result<DateTime<Utc>, DbErr> {
        let repo = UserConfigRepository::new(&self.local);

        let mut config = repo
            .get_by_user_id(user_id)
            .await?
            .unwrap_or_else(|| UserConfig::empty(user_id));

        let updated_at = Utc::now();
        config.set_guild_routes(
            guild_id,
            StoredGuildRoutes {
                mapping,
                updated_at,
            },
        );
        repo.upsert(config).await?;

        Ok(updated_at)
    }

    async fn set_status(&self, status: SyncStatus) {
        *self.status.write().await = status;
    }
}
