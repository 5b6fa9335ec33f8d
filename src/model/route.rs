use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKindDto {
    Text,
    Announcement,
    Forum,
    Voice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChannelDto {
    pub id: String,
    pub name: String,
    pub kind: Option<ChannelKindDto>,
    pub parent_id: Option<String>,
}

/// One editor row: a channel with its current path and validation flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RouteRowDto {
    pub channel: ChannelDto,
    pub path: String,
    pub invalid: bool,
    pub duplicate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EditorStateDto {
    Clean,
    Dirty,
    Validating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SyncStatusDto {
    Off,
    Loading,
    Saving,
    Ready { updated_at: Option<DateTime<Utc>> },
    Error { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GuildRoutesDto {
    pub guild_id: String,
    pub state: EditorStateDto,
    pub sync: SyncStatusDto,
    pub updated_at: Option<DateTime<Utc>>,
    pub allow_overlap: bool,
    pub rows: Vec<RouteRowDto>,
    pub mapping: BTreeMap<String, String>,
    pub invalid_channel_ids: Vec<String>,
    pub duplicate_channel_ids: Vec<String>,
    pub duplicate_paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SetRouteDto {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BulkPrefixDto {
    pub channel_ids: Vec<String>,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BulkPatternDto {
    /// Channel name pattern of the form `literal*`.
    pub pattern: String,
    /// Path template; `:name` is replaced by the unmatched remainder of the name.
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BulkResultDto {
    pub affected: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImportRoutesDto {
    /// JSON text of a flat object mapping channel ids to paths.
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OverlapSettingDto {
    pub allow_overlap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SaveRejectionDto {
    pub invalid_channel_ids: Vec<String>,
    pub duplicate_channel_ids: Vec<String>,
    pub duplicate_paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RemoteSaveDto {
    /// Remote store is not configured; data is persisted locally only.
    Off,
    /// Remote save dispatched; poll the status endpoint for the outcome.
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SaveResultDto {
    pub guild_id: String,
    pub saved_at: DateTime<Utc>,
    pub remote: RemoteSaveDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditEntryDto {
    pub guild_id: String,
    pub channel_id: String,
    pub before: String,
    pub after: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EditorStatusDto {
    pub active_guild_id: Option<String>,
    pub state: EditorStateDto,
    pub sync: SyncStatusDto,
    pub dirty_guild_ids: Vec<String>,
    pub pending_edits: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NavigationDto {
    pub allowed: bool,
    pub dirty_guild_ids: Vec<String>,
}
