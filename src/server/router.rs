use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    model::{api::ErrorDto, route as dto},
    server::{controller::route, state::AppState},
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Routeboard API", description = "Per-guild Discord channel route configuration"),
    paths(
        route::select_guild,
        route::refresh_channels,
        route::set_route,
        route::clear_route,
        route::apply_prefix,
        route::apply_pattern,
        route::import_routes,
        route::export_routes,
        route::save_routes,
        route::rollback_routes,
        route::set_overlap,
        route::get_status,
        route::get_audit_log,
        route::check_navigation,
    ),
    components(schemas(
        ErrorDto,
        dto::ChannelKindDto,
        dto::ChannelDto,
        dto::RouteRowDto,
        dto::EditorStateDto,
        dto::SyncStatusDto,
        dto::GuildRoutesDto,
        dto::SetRouteDto,
        dto::BulkPrefixDto,
        dto::BulkPatternDto,
        dto::BulkResultDto,
        dto::ImportRoutesDto,
        dto::OverlapSettingDto,
        dto::SaveRejectionDto,
        dto::RemoteSaveDto,
        dto::SaveResultDto,
        dto::AuditEntryDto,
        dto::EditorStatusDto,
        dto::NavigationDto,
    )),
    tags((name = "route", description = "Channel route editing"))
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/routes/guilds/{guild_id}", get(route::select_guild))
        .route(
            "/api/routes/guilds/{guild_id}/channels/refresh",
            post(route::refresh_channels),
        )
        .route(
            "/api/routes/guilds/{guild_id}/channels/{channel_id}",
            put(route::set_route).delete(route::clear_route),
        )
        .route(
            "/api/routes/guilds/{guild_id}/bulk/prefix",
            post(route::apply_prefix),
        )
        .route(
            "/api/routes/guilds/{guild_id}/bulk/pattern",
            post(route::apply_pattern),
        )
        .route(
            "/api/routes/guilds/{guild_id}/import",
            post(route::import_routes),
        )
        .route(
            "/api/routes/guilds/{guild_id}/export",
            get(route::export_routes),
        )
        .route("/api/routes/guilds/{guild_id}/save", post(route::save_routes))
        .route(
            "/api/routes/guilds/{guild_id}/rollback",
            post(route::rollback_routes),
        )
        .route("/api/routes/overlap", put(route::set_overlap))
        .route("/api/routes/status", get(route::get_status))
        .route("/api/routes/audit", get(route::get_audit_log))
        .route("/api/routes/navigation", get(route::check_navigation))
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

/// Builds the CORS layer for a frontend served from another origin.
///
/// Credentials are allowed so the session cookie is sent with API requests.
///
/// # Returns
/// - `Some(CorsLayer)` - `app_url` is a valid header value
/// - `None` - `app_url` cannot be used as an origin
pub fn cors_layer(app_url: &str) -> Option<CorsLayer> {
    let origin = HeaderValue::from_str(app_url.trim_end_matches('/')).ok()?;

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}
