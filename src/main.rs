mod model;
mod server;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::server::{
    config::Config,
    error::AppError,
    router,
    scheduler::editor_eviction,
    service::{discord::DiscordChannelDirectory, route::registry::EditorRegistry},
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routeboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let remote_db = startup::connect_to_remote_database(&config).await?;
    let session = startup::connect_to_session(&db).await?;
    let discord_http = startup::setup_discord_http(&config);

    let editors = EditorRegistry::new(db, remote_db, config.route_edit_debounce);

    // Start idle editor eviction
    let scheduler_editors = editors.clone();
    let idle_ttl = config.editor_idle_ttl;
    tokio::spawn(async move {
        if let Err(e) = editor_eviction::start_scheduler(scheduler_editors, idle_ttl).await {
            tracing::error!("Editor eviction scheduler error: {}", e);
        }
    });

    let state = AppState::new(editors, DiscordChannelDirectory::new(discord_http));

    let mut app = router::router().with_state(state).layer(session);
    if let Some(app_url) = &config.app_url {
        match router::cors_layer(app_url) {
            Some(cors) => app = app.layer(cors),
            None => tracing::warn!("APP_URL '{}' is not a valid origin, CORS disabled", app_url),
        }
    }

    let listener = TcpListener::bind(config.bind_address).await?;

    tracing::info!("Starting server on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
