use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        route::{
            AuditEntryDto, BulkPatternDto, BulkPrefixDto, BulkResultDto, EditorStatusDto,
            GuildRoutesDto, ImportRoutesDto, NavigationDto, OverlapSettingDto, RemoteSaveDto,
            SaveRejectionDto, SaveResultDto, SetRouteDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::route::AuditEntry,
        service::route::{
            editor::SaveOutcome, guard::NavigationGuard, registry::SharedEditor,
            sync::RemoteDispatch,
        },
        state::AppState,
    },
};

/// Tag for grouping channel route endpoints in OpenAPI documentation
pub static ROUTE_TAG: &str = "route";

/// Select a guild for editing.
///
/// Makes the guild the user's active guild. A guild opened earlier in the
/// session is switched to without reloading, keeping its unsaved edits. A guild
/// opened for the first time has its channels fetched from Discord and its
/// mapping loaded from local persistence, then from the remote routing store.
///
/// # Arguments
/// - `state` - Application state containing the editor registry
/// - `session` - User's session for authentication
/// - `guild_id` - Discord guild ID to select
///
/// # Returns
/// - `200 OK` - Guild routes with per-channel validation flags
/// - `401 Unauthorized` - User not authenticated
/// - `500 Internal Server Error` - Discord or database error
#[utoipa::path(
    get,
    path = "/api/routes/guilds/{guild_id}",
    tag = ROUTE_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID")
    ),
    responses(
        (status = 200, description = "Guild routes", body = GuildRoutesDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn select_guild(
    State(state): State<AppState>,
    session: Session,
    Path(guild_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;
    let editor = prepare_editor(&state, user_id).await;

    let loaded = editor.lock().await.is_loaded(guild_id);
    if loaded {
        editor.lock().await.ensure_active(guild_id)?;
    } else {
        let channels = state.channel_directory.list_channels(guild_id).await?;
        editor.lock().await.select_guild(guild_id, channels).await?;
    }

    let routes = editor.lock().await.guild_routes().await?;

    Ok((StatusCode::OK, Json(routes.into_dto())))
}

/// Reload a guild's channels from Discord.
///
/// Refreshes the channel list of a loaded guild and makes it active. Unsaved
/// edits are kept.
///
/// # Returns
/// - `200 OK` - Guild routes with the refreshed channel list
/// - `401 Unauthorized` - User not authenticated
/// - `409 Conflict` - Guild has not been selected this session
/// - `500 Internal Server Error` - Discord error
#[utoipa::path(
    post,
    path = "/api/routes/guilds/{guild_id}/channels/refresh",
    tag = ROUTE_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID")
    ),
    responses(
        (status = 200, description = "Guild routes", body = GuildRoutesDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 409, description = "Guild has not been selected", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn refresh_channels(
    State(state): State<AppState>,
    session: Session,
    Path(guild_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;
    let editor = prepare_editor(&state, user_id).await;

    editor.lock().await.ensure_active(guild_id)?;

    let channels = state.channel_directory.list_channels(guild_id).await?;

    let mut editor = editor.lock().await;
    editor.select_guild(guild_id, channels).await?;
    let routes = editor.guild_routes().await?;

    Ok((StatusCode::OK, Json(routes.into_dto())))
}

/// Set a channel's route path.
///
/// The edit is debounced: rapid edits to the same channel are coalesced and only
/// the last value is applied. Pending edits are always applied before a save,
/// export or read of the guild's routes.
///
/// # Returns
/// - `202 Accepted` - Edit queued
/// - `401 Unauthorized` - User not authenticated
/// - `409 Conflict` - Guild has not been selected this session
#[utoipa::path(
    put,
    path = "/api/routes/guilds/{guild_id}/channels/{channel_id}",
    tag = ROUTE_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID"),
        ("channel_id" = String, Path, description = "Discord channel ID")
    ),
    request_body = SetRouteDto,
    responses(
        (status = 202, description = "Edit queued"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 409, description = "Guild has not been selected", body = ErrorDto)
    ),
)]
pub async fn set_route(
    State(state): State<AppState>,
    session: Session,
    Path((guild_id, channel_id)): Path<(u64, String)>,
    Json(payload): Json<SetRouteDto>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;

    state
        .editors
        .queue_edit(user_id, guild_id, channel_id, payload.path)
        .await?;

    Ok(StatusCode::ACCEPTED)
}

/// Clear a channel's route path.
///
/// # Returns
/// - `200 OK` - Guild routes after the change
/// - `401 Unauthorized` - User not authenticated
/// - `409 Conflict` - Guild has not been selected this session
#[utoipa::path(
    delete,
    path = "/api/routes/guilds/{guild_id}/channels/{channel_id}",
    tag = ROUTE_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID"),
        ("channel_id" = String, Path, description = "Discord channel ID")
    ),
    responses(
        (status = 200, description = "Guild routes", body = GuildRoutesDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 409, description = "Guild has not been selected", body = ErrorDto)
    ),
)]
pub async fn clear_route(
    State(state): State<AppState>,
    session: Session,
    Path((guild_id, channel_id)): Path<(u64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;
    let editor = prepare_editor(&state, user_id).await;

    let mut editor = editor.lock().await;
    editor.ensure_active(guild_id)?;
    editor.clear(&channel_id)?;
    let routes = editor.guild_routes().await?;

    Ok((StatusCode::OK, Json(routes.into_dto())))
}

/// Apply a path prefix to selected channels.
///
/// Each selected channel gets the prefix followed by a slug of its name. The
/// whole operation is rejected when any channel id is unknown. Nothing is saved.
///
/// # Returns
/// - `200 OK` - Number of channels updated
/// - `400 Bad Request` - Unknown channel ids
/// - `401 Unauthorized` - User not authenticated
/// - `409 Conflict` - Guild has not been selected this session
#[utoipa::path(
    post,
    path = "/api/routes/guilds/{guild_id}/bulk/prefix",
    tag = ROUTE_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID")
    ),
    request_body = BulkPrefixDto,
    responses(
        (status = 200, description = "Channels updated", body = BulkResultDto),
        (status = 400, description = "Unknown channel ids", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 409, description = "Guild has not been selected", body = ErrorDto)
    ),
)]
pub async fn apply_prefix(
    State(state): State<AppState>,
    session: Session,
    Path(guild_id): Path<u64>,
    Json(payload): Json<BulkPrefixDto>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;
    let editor = prepare_editor(&state, user_id).await;

    let mut editor = editor.lock().await;
    editor.ensure_active(guild_id)?;
    let affected = editor.apply_prefix(&payload.channel_ids, &payload.prefix)?;

    Ok((StatusCode::OK, Json(BulkResultDto { affected })))
}

/// Apply a path template to channels matching a name pattern.
///
/// The pattern has the form `literal*`; `:name` in the template is replaced by
/// the rest of each matching channel's name. Nothing is saved.
///
/// # Returns
/// - `200 OK` - Number of channels matched and updated
/// - `400 Bad Request` - Empty pattern
/// - `401 Unauthorized` - User not authenticated
/// - `409 Conflict` - Guild has not been selected this session
#[utoipa::path(
    post,
    path = "/api/routes/guilds/{guild_id}/bulk/pattern",
    tag = ROUTE_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID")
    ),
    request_body = BulkPatternDto,
    responses(
        (status = 200, description = "Channels updated", body = BulkResultDto),
        (status = 400, description = "Invalid pattern", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 409, description = "Guild has not been selected", body = ErrorDto)
    ),
)]
pub async fn apply_pattern(
    State(state): State<AppState>,
    session: Session,
    Path(guild_id): Path<u64>,
    Json(payload): Json<BulkPatternDto>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;
    let editor = prepare_editor(&state, user_id).await;

    let mut editor = editor.lock().await;
    editor.ensure_active(guild_id)?;
    let affected = editor.apply_pattern(&payload.pattern, &payload.template)?;

    Ok((StatusCode::OK, Json(BulkResultDto { affected })))
}

/// Import channel routes from a JSON mapping.
///
/// The payload must be a JSON object of channel id to path strings. It is
/// merged into the working mapping only if it parses completely.
///
/// # Returns
/// - `200 OK` - Number of entries applied
/// - `400 Bad Request` - Malformed payload, nothing applied
/// - `401 Unauthorized` - User not authenticated
/// - `409 Conflict` - Guild has not been selected this session
#[utoipa::path(
    post,
    path = "/api/routes/guilds/{guild_id}/import",
    tag = ROUTE_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID")
    ),
    request_body = ImportRoutesDto,
    responses(
        (status = 200, description = "Entries applied", body = BulkResultDto),
        (status = 400, description = "Malformed import", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 409, description = "Guild has not been selected", body = ErrorDto)
    ),
)]
pub async fn import_routes(
    State(state): State<AppState>,
    session: Session,
    Path(guild_id): Path<u64>,
    Json(payload): Json<ImportRoutesDto>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;
    let editor = prepare_editor(&state, user_id).await;

    let mut editor = editor.lock().await;
    editor.ensure_active(guild_id)?;
    let affected = editor.import_json(&payload.payload)?;

    Ok((StatusCode::OK, Json(BulkResultDto { affected })))
}

/// Export the working mapping of a guild as JSON.
///
/// # Returns
/// - `200 OK` - JSON object of channel id to path
/// - `401 Unauthorized` - User not authenticated
/// - `409 Conflict` - Guild has not been selected this session
#[utoipa::path(
    get,
    path = "/api/routes/guilds/{guild_id}/export",
    tag = ROUTE_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID")
    ),
    responses(
        (status = 200, description = "Channel id to path mapping", body = BTreeMap<String, String>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 409, description = "Guild has not been selected", body = ErrorDto)
    ),
)]
pub async fn export_routes(
    State(state): State<AppState>,
    session: Session,
    Path(guild_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;
    let editor = prepare_editor(&state, user_id).await;

    let mut editor = editor.lock().await;
    editor.ensure_active(guild_id)?;
    let exported = editor.export_json()?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        exported,
    ))
}

/// Save a guild's working mapping.
///
/// Every path is validated and duplicate paths are detected. When any path is
/// invalid, or paths are shared while overlap is not allowed, nothing is saved
/// and the offending channel ids are returned. Otherwise the mapping is stored
/// locally and the remote save continues in the background; poll the status
/// endpoint for its outcome.
///
/// # Returns
/// - `200 OK` - Mapping saved locally
/// - `401 Unauthorized` - User not authenticated
/// - `409 Conflict` - Guild has not been selected this session
/// - `422 Unprocessable Entity` - Invalid or duplicate paths, nothing saved
/// - `500 Internal Server Error` - Local persistence failed
#[utoipa::path(
    post,
    path = "/api/routes/guilds/{guild_id}/save",
    tag = ROUTE_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID")
    ),
    responses(
        (status = 200, description = "Mapping saved", body = SaveResultDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 409, description = "Guild has not been selected", body = ErrorDto),
        (status = 422, description = "Invalid or duplicate paths", body = SaveRejectionDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn save_routes(
    State(state): State<AppState>,
    session: Session,
    Path(guild_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;
    let editor = prepare_editor(&state, user_id).await;

    let mut editor = editor.lock().await;
    editor.ensure_active(guild_id)?;

    let response = match editor.save().await? {
        SaveOutcome::Rejected(report) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(report.into_dto())).into_response()
        }
        SaveOutcome::Saved(saved) => {
            let remote = match saved.remote {
                RemoteDispatch::Off => RemoteSaveDto::Off,
                RemoteDispatch::Pending(_) => RemoteSaveDto::Pending,
            };

            (
                StatusCode::OK,
                Json(SaveResultDto {
                    guild_id: saved.guild_id.to_string(),
                    saved_at: saved.updated_at,
                    remote,
                }),
            )
                .into_response()
        }
    };

    Ok(response)
}

/// Discard unsaved edits of a guild.
///
/// Restores the mapping as last saved or, if it was never saved this session,
/// as loaded.
///
/// # Returns
/// - `200 OK` - Guild routes after rollback
/// - `401 Unauthorized` - User not authenticated
/// - `409 Conflict` - Guild has not been selected this session
#[utoipa::path(
    post,
    path = "/api/routes/guilds/{guild_id}/rollback",
    tag = ROUTE_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID")
    ),
    responses(
        (status = 200, description = "Guild routes", body = GuildRoutesDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 409, description = "Guild has not been selected", body = ErrorDto)
    ),
)]
pub async fn rollback_routes(
    State(state): State<AppState>,
    session: Session,
    Path(guild_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;
    let editor = prepare_editor(&state, user_id).await;

    let mut editor = editor.lock().await;
    editor.ensure_active(guild_id)?;
    editor.rollback_to_last_saved()?;
    let routes = editor.guild_routes().await?;

    Ok((StatusCode::OK, Json(routes.into_dto())))
}

/// Set whether duplicate paths may be saved.
///
/// # Returns
/// - `200 OK` - Updated setting
/// - `401 Unauthorized` - User not authenticated
#[utoipa::path(
    put,
    path = "/api/routes/overlap",
    tag = ROUTE_TAG,
    request_body = OverlapSettingDto,
    responses(
        (status = 200, description = "Updated setting", body = OverlapSettingDto),
        (status = 401, description = "User not authenticated", body = ErrorDto)
    ),
)]
pub async fn set_overlap(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<OverlapSettingDto>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;
    let editor = state.editors.editor(user_id).await;

    let mut editor = editor.lock().await;
    editor.set_allow_overlap(payload.allow_overlap);

    Ok((
        StatusCode::OK,
        Json(OverlapSettingDto {
            allow_overlap: editor.allow_overlap(),
        }),
    ))
}

/// Get the user's editor status.
///
/// Reports the active guild, its edit state, the remote synchronization state,
/// every guild with unsaved edits and the number of edits still being
/// debounced.
///
/// # Returns
/// - `200 OK` - Editor status
/// - `401 Unauthorized` - User not authenticated
#[utoipa::path(
    get,
    path = "/api/routes/status",
    tag = ROUTE_TAG,
    responses(
        (status = 200, description = "Editor status", body = EditorStatusDto),
        (status = 401, description = "User not authenticated", body = ErrorDto)
    ),
)]
pub async fn get_status(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;
    let editor = state.editors.editor(user_id).await;
    let pending_edits = state.editors.pending_edits(user_id).await;

    let editor = editor.lock().await;
    let status = EditorStatusDto {
        active_guild_id: editor.active_guild().map(|guild_id| guild_id.to_string()),
        state: editor.state().into_dto(),
        sync: editor.sync_status().await.into_dto(),
        dirty_guild_ids: editor
            .dirty_guilds()
            .into_iter()
            .map(|guild_id| guild_id.to_string())
            .collect(),
        pending_edits,
    };

    Ok((StatusCode::OK, Json(status)))
}

/// Get the path changes made during this session.
///
/// # Returns
/// - `200 OK` - Audit entries, oldest first
/// - `401 Unauthorized` - User not authenticated
#[utoipa::path(
    get,
    path = "/api/routes/audit",
    tag = ROUTE_TAG,
    responses(
        (status = 200, description = "Audit entries", body = Vec<AuditEntryDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto)
    ),
)]
pub async fn get_audit_log(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;
    let editor = prepare_editor(&state, user_id).await;

    let entries: Vec<AuditEntryDto> = editor
        .lock()
        .await
        .audit_log()
        .iter()
        .cloned()
        .map(AuditEntry::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(entries)))
}

/// Check whether the user can leave the editor without losing edits.
///
/// # Returns
/// - `200 OK` - Navigation decision with the guilds holding unsaved edits
/// - `401 Unauthorized` - User not authenticated
#[utoipa::path(
    get,
    path = "/api/routes/navigation",
    tag = ROUTE_TAG,
    responses(
        (status = 200, description = "Navigation decision", body = NavigationDto),
        (status = 401, description = "User not authenticated", body = ErrorDto)
    ),
)]
pub async fn check_navigation(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user_id = AuthGuard::new(&session).require_user().await?;

    let navigation = NavigationGuard::new(&state.editors).check(user_id).await;

    Ok((StatusCode::OK, Json(navigation.into_dto())))
}

/// Applies the user's pending debounced edits and returns their editor.
async fn prepare_editor(state: &AppState, user_id: u64) -> SharedEditor {
    state.editors.flush_edits(user_id).await;
    state.editors.editor(user_id).await
}
