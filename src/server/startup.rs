use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serenity::http::Http;
use time::Duration;
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::server::{config::Config, error::AppError};

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the application can
/// access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(Error)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Connects to the remote routing store, if one is configured.
///
/// The remote store may be any database SeaORM supports. Its schema is managed
/// by a separate migrator so it can live in a database shared with other
/// services. Remote synchronization stays off when no URL is configured.
///
/// # Returns
/// - `Ok(Some(DatabaseConnection))` - Connected remote store with migrations applied
/// - `Ok(None)` - No remote store configured
/// - `Err(AppError::DbErr)` - Remote store configured but unreachable at startup
pub async fn connect_to_remote_database(
    config: &Config,
) -> Result<Option<DatabaseConnection>, AppError> {
    use migration::{MigratorTrait, RemoteMigrator};

    let Some(remote_url) = &config.remote_database_url else {
        tracing::info!("No remote routing store configured, routes are stored locally only");
        return Ok(None);
    };

    let mut opt = ConnectOptions::new(remote_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    RemoteMigrator::up(&db, None).await?;

    tracing::info!("Connected to remote routing store");

    Ok(Some(db))
}

/// Creates the session layer backed by the primary database.
///
/// Sessions expire after seven days of inactivity.
///
/// # Returns
/// - `Ok(SessionManagerLayer)` - Session layer with its table migrated
/// - `Err(AppError::SqlxErr)` - Failed to create the session table
pub async fn connect_to_session(
    db: &DatabaseConnection,
) -> Result<SessionManagerLayer<SqliteStore>, AppError> {
    let pool = db.get_sqlite_connection_pool();
    let session_store = SqliteStore::new(pool.clone());

    session_store.migrate().await?;

    let session = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)));

    Ok(session)
}

/// Creates the Discord HTTP client used by the channel directory.
pub fn setup_discord_http(config: &Config) -> Arc<Http> {
    Arc::new(Http::new(&config.discord_bot_token))
}
