use super::*;

/// Tests that a save with an invalid path and a duplicate path is rejected.
///
/// Verifies that both lists are returned, the draft stays dirty and nothing is
/// written to local persistence.
///
/// Expected: Ok(SaveOutcome::Rejected) with both lists
#[tokio::test]
async fn rejects_invalid_and_duplicate_paths() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mut editor = editor(db, None);
    editor.select_guild(GUILD_A, channels()).await?;
    editor.set("c1", "/a/")?;
    editor.set("c2", "/dup")?;
    editor.set("c3", "/dup")?;

    let SaveOutcome::Rejected(report) = editor.save().await? else {
        panic!("expected the save to be rejected");
    };

    assert_eq!(report.invalid_channel_ids, vec!["c1".to_string()]);
    assert_eq!(
        report.duplicate_channel_ids,
        vec!["c2".to_string(), "c3".to_string()]
    );
    assert_eq!(report.duplicate_paths, vec!["/dup".to_string()]);
    assert_eq!(editor.state(), EditorState::Dirty);

    let reconciler = SyncReconciler::new(db.clone(), None);
    assert!(reconciler.load_local(USER_ID, GUILD_A).await?.is_none());

    Ok(())
}

/// Tests that duplicates are saved when overlap is allowed.
///
/// Expected: Ok(SaveOutcome::Saved)
#[tokio::test]
async fn saves_duplicates_when_overlap_allowed() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mut editor = editor(db, None);
    editor.select_guild(GUILD_A, channels()).await?;
    editor.set("c2", "/dup")?;
    editor.set("c3", "/dup")?;
    editor.set_allow_overlap(true);

    assert_eq!(
        editor.validation_report().duplicate_paths,
        vec!["/dup".to_string()]
    );
    assert!(matches!(editor.save().await?, SaveOutcome::Saved(_)));
    assert_eq!(editor.state(), EditorState::Clean);

    Ok(())
}

/// Tests saving while the remote store is not configured.
///
/// Expected: Ok(SaveOutcome::Saved) with remote Off and the mapping readable
/// from local persistence
#[tokio::test]
async fn saves_locally_when_remote_off() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mut editor = editor(db, None);
    editor.select_guild(GUILD_A, channels()).await?;
    editor.set("c1", "/y")?;

    let SaveOutcome::Saved(saved) = editor.save().await? else {
        panic!("expected the save to succeed");
    };

    assert_eq!(saved.guild_id, GUILD_A);
    assert!(matches!(saved.remote, RemoteDispatch::Off));
    assert_eq!(editor.state(), EditorState::Clean);

    let reconciler = SyncReconciler::new(db.clone(), None);
    let stored = reconciler.load_local(USER_ID, GUILD_A).await?.unwrap();
    assert_eq!(stored.mapping, mapping(&[("c1", "/y")]));
    assert_eq!(stored.updated_at, saved.updated_at);

    Ok(())
}

/// Tests that a successful save reaches the remote store in the background.
///
/// Expected: Ok with remote save completed and status Ready
#[tokio::test]
async fn dispatches_remote_save() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mut editor = editor(db, Some(db.clone()));
    editor.select_guild(GUILD_A, channels()).await?;
    editor.set("c1", "/y")?;

    let SaveOutcome::Saved(saved) = editor.save().await? else {
        panic!("expected the save to succeed");
    };
    let RemoteDispatch::Pending(handle) = saved.remote else {
        panic!("expected a pending remote save");
    };
    let RemoteSave::Saved(updated_at) = handle.await.unwrap() else {
        panic!("expected the remote save to succeed");
    };

    assert_eq!(
        editor.sync_status().await,
        SyncStatus::Ready {
            updated_at: Some(updated_at)
        }
    );

    let reconciler = SyncReconciler::new(db.clone(), Some(db.clone()));
    let RemoteLoad::Loaded(record) = reconciler.load(USER_ID, GUILD_A).await else {
        panic!("expected the remote record");
    };
    assert_eq!(record.mapping, mapping(&[("c1", "/y")]));

    Ok(())
}

/// Tests that a failing remote store never undoes the local save.
///
/// Expected: Ok with local data stored, draft clean and status Error
#[tokio::test]
async fn remote_failure_keeps_local_save() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let broken = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mut editor = editor(db, broken.db.clone());
    editor.select_guild(GUILD_A, channels()).await?;
    editor.set("c1", "/y")?;

    let SaveOutcome::Saved(saved) = editor.save().await? else {
        panic!("expected the local save to succeed");
    };
    let RemoteDispatch::Pending(handle) = saved.remote else {
        panic!("expected a pending remote save");
    };

    assert!(matches!(handle.await.unwrap(), RemoteSave::Failed(_)));
    assert!(matches!(
        editor.sync_status().await,
        SyncStatus::Error { .. }
    ));
    assert_eq!(editor.state(), EditorState::Clean);

    let reconciler = SyncReconciler::new(db.clone(), None);
    let stored = reconciler.load_local(USER_ID, GUILD_A).await?.unwrap();
    assert_eq!(stored.mapping, mapping(&[("c1", "/y")]));

    Ok(())
}

/// Tests that saving keeps keys of the configuration document the routing
/// engine does not own.
///
/// Expected: Ok with unrelated keys preserved
#[tokio::test]
async fn preserves_unrelated_document_keys() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    UserConfigFactory::new(db)
        .user_id(USER_ID.to_string())
        .document(serde_json::json!({ "theme": "dark" }))
        .build()
        .await?;

    let mut editor = editor(db, None);
    editor.select_guild(GUILD_A, channels()).await?;
    editor.set("c1", "/y")?;
    editor.save().await?;

    let config = crate::server::data::user_config::UserConfigRepository::new(db)
        .get_by_user_id(USER_ID)
        .await?
        .unwrap();
    assert_eq!(config.document.get("theme"), Some(&serde_json::json!("dark")));

    Ok(())
}

/// Tests saving before any guild is selected.
///
/// Expected: Err(RoutingError::NoGuildSelected)
#[tokio::test]
async fn fails_without_selected_guild() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mut editor = editor(db, None);
    let result = editor.save().await;

    assert!(matches!(
        result,
        Err(AppError::RoutingErr(RoutingError::NoGuildSelected))
    ));

    Ok(())
}

/// Tests that a save dropped before it finishes does not leave the editor validating.
///
/// Drops the save future at its first await point, as happens when a client
/// disconnects mid-request.
///
/// Expected: state is Dirty when the save was dropped, Clean if it completed
#[tokio::test]
async fn dropped_save_resets_validating_state() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mut editor = editor(db, None);
    editor.select_guild(GUILD_A, channels()).await?;
    editor.set("c1", "/x")?;

    match tokio::time::timeout(Duration::ZERO, editor.save()).await {
        Err(_) => assert_eq!(editor.state(), EditorState::Dirty),
        Ok(outcome) => {
            assert!(matches!(outcome?, SaveOutcome::Saved(_)));
            assert_eq!(editor.state(), EditorState::Clean);
        }
    }
    assert_ne!(editor.state(), EditorState::Validating);

    assert!(matches!(editor.save().await?, SaveOutcome::Saved(_)));
    assert_eq!(editor.state(), EditorState::Clean);

    Ok(())
}
