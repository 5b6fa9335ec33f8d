use super::*;

/// Tests loading a guild when no remote store is configured.
///
/// Verifies that the local configuration document is the source of the mapping
/// and the editor starts clean.
///
/// Expected: Ok with local mapping active
#[tokio::test]
async fn loads_local_copy_when_remote_off() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserConfigFactory::new(db)
        .user_id(USER_ID.to_string())
        .document(local_document(GUILD_A, &[("c1", "/x")]))
        .build()
        .await?;

    let mut editor = editor(db, None);
    editor.select_guild(GUILD_A, channels()).await?;

    assert_eq!(editor.active_guild(), Some(GUILD_A));
    assert_eq!(editor.get("c1"), "/x");
    assert_eq!(editor.get("c2"), "");
    assert_eq!(editor.state(), EditorState::Clean);
    assert_eq!(editor.sync_status().await, SyncStatus::Off);

    Ok(())
}

/// Tests that a remote copy replaces the local copy on load.
///
/// Expected: Ok with remote mapping active and status Ready
#[tokio::test]
async fn remote_copy_overrides_local() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserConfigFactory::new(db)
        .user_id(USER_ID.to_string())
        .document(local_document(GUILD_A, &[("c1", "/local")]))
        .build()
        .await?;
    RouteMappingFactory::new(db)
        .user_id(USER_ID.to_string())
        .guild_id(GUILD_A.to_string())
        .route("c1", "/remote")
        .build()
        .await?;

    let mut editor = editor(db, Some(db.clone()));
    editor.select_guild(GUILD_A, channels()).await?;

    assert_eq!(editor.snapshot(), mapping(&[("c1", "/remote")]));
    assert!(matches!(
        editor.sync_status().await,
        SyncStatus::Ready {
            updated_at: Some(_)
        }
    ));

    Ok(())
}

/// Tests that an unreachable remote store does not block loading.
///
/// Expected: Ok with local mapping active and status Error
#[tokio::test]
async fn keeps_local_copy_when_remote_fails() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let broken = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserConfigFactory::new(db)
        .user_id(USER_ID.to_string())
        .document(local_document(GUILD_A, &[("c1", "/local")]))
        .build()
        .await?;

    let mut editor = editor(db, broken.db.clone());
    editor.select_guild(GUILD_A, channels()).await?;

    assert_eq!(editor.get("c1"), "/local");
    assert!(matches!(
        editor.sync_status().await,
        SyncStatus::Error { .. }
    ));

    Ok(())
}

/// Tests loading a guild that has never been saved anywhere.
///
/// Expected: Ok with an empty clean mapping
#[tokio::test]
async fn starts_empty_for_new_guild() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mut editor = editor(db, Some(db.clone()));
    editor.select_guild(GUILD_A, channels()).await?;

    assert!(editor.snapshot().is_empty());
    assert_eq!(editor.state(), EditorState::Clean);
    assert_eq!(
        editor.sync_status().await,
        SyncStatus::Ready { updated_at: None }
    );

    Ok(())
}

/// Tests that switching guilds never loses or leaks edits.
///
/// Guild A is saved with `{c1: "/x"}`, guild B is edited, then guild A is
/// selected again.
///
/// Expected: Ok with guild A unchanged and clean, guild B still dirty
#[tokio::test]
async fn switching_back_keeps_saved_guild_unchanged() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mut editor = editor(db, None);
    editor.select_guild(GUILD_A, channels()).await?;
    editor.set("c1", "/x")?;
    assert!(matches!(editor.save().await?, SaveOutcome::Saved(_)));

    editor.select_guild(GUILD_B, channels()).await?;
    assert!(editor.snapshot().is_empty());
    editor.set("c1", "/y")?;
    editor.set("c2", "/z")?;

    editor.select_guild(GUILD_A, channels()).await?;

    assert_eq!(editor.snapshot(), mapping(&[("c1", "/x")]));
    assert_eq!(editor.state(), EditorState::Clean);
    assert_eq!(editor.dirty_guilds(), vec![GUILD_B]);

    editor.ensure_active(GUILD_B)?;
    assert_eq!(editor.snapshot(), mapping(&[("c1", "/y"), ("c2", "/z")]));
    assert_eq!(editor.state(), EditorState::Dirty);

    Ok(())
}

/// Tests switching to a guild that was never selected.
///
/// Expected: Err(RoutingError::GuildNotLoaded)
#[tokio::test]
async fn ensure_active_requires_loaded_guild() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mut editor = editor(db, None);

    assert_eq!(
        editor.ensure_active(GUILD_A),
        Err(RoutingError::GuildNotLoaded(GUILD_A))
    );
    assert_eq!(editor.set("c1", "/x"), Err(RoutingError::NoGuildSelected));

    Ok(())
}

/// Tests that a local document which is not a JSON object does not block loading.
///
/// Verifies the remote copy is still used.
///
/// Expected: Ok with remote mapping active
#[tokio::test]
async fn ignores_malformed_local_document() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserConfigFactory::new(db)
        .user_id(USER_ID.to_string())
        .document(serde_json::json!(["not", "an", "object"]))
        .build()
        .await?;
    RouteMappingFactory::new(db)
        .user_id(USER_ID.to_string())
        .guild_id(GUILD_A.to_string())
        .route("c1", "/remote")
        .build()
        .await?;

    let mut editor = editor(db, Some(db.clone()));
    editor.select_guild(GUILD_A, channels()).await?;

    assert_eq!(editor.snapshot(), mapping(&[("c1", "/remote")]));
    assert_eq!(editor.state(), EditorState::Clean);

    Ok(())
}
