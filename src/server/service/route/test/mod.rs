use std::time::Duration;

use sea_orm::DatabaseConnection;
use test_utils::{
    builder::TestBuilder,
    factory::{route_mapping::RouteMappingFactory, user_config::UserConfigFactory},
};

use crate::server::{
    error::{routing::RoutingError, AppError},
    model::route::{Channel, RouteMapping},
    service::route::{
        editor::{EditorState, RoutingEditor, SaveOutcome, AUDIT_LOG_LIMIT},
        guard::{Navigation, NavigationGuard},
        registry::EditorRegistry,
        sync::{RemoteDispatch, RemoteLoad, RemoteSave, SyncReconciler, SyncStatus},
    },
};

mod guard;
mod save;
mod select_guild;

const USER_ID: u64 = 42;
const GUILD_A: u64 = 1001;
const GUILD_B: u64 = 1002;

fn channels() -> Vec<Channel> {
    vec![
        Channel::new("c1", "#Alpha-Setup"),
        Channel::new("c2", "#news-eur"),
        Channel::new("c3", "alerts-eur"),
        Channel::new("c4", "general"),
    ]
}

fn mapping(entries: &[(&str, &str)]) -> RouteMapping {
    entries
        .iter()
        .map(|(channel, path)| (channel.to_string(), path.to_string()))
        .collect()
}

fn editor(db: &DatabaseConnection, remote: Option<DatabaseConnection>) -> RoutingEditor {
    RoutingEditor::new(USER_ID, SyncReconciler::new(db.clone(), remote))
}

/// Local configuration document holding `entries` for `guild_id`.
fn local_document(guild_id: u64, entries: &[(&str, &str)]) -> serde_json::Value {
    serde_json::json!({
        "channelRoutes": {
            guild_id.to_string(): {
                "mapping": mapping(entries),
                "updatedAt": "2026-01-01T00:00:00Z"
            }
        }
    })
}
