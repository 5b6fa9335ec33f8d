use super::*;

/// Tests the guard for a user without an editor.
///
/// Expected: Navigation::Proceed
#[tokio::test]
async fn proceeds_without_editor() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let registry = EditorRegistry::new(db.clone(), None, Duration::from_millis(20));

    assert_eq!(
        NavigationGuard::new(&registry).check(USER_ID).await,
        Navigation::Proceed
    );

    Ok(())
}

/// Tests that unsaved edits, including edits still waiting on the debounce
/// delay, block navigation until they are saved.
///
/// Expected: Navigation::Block before the save and Navigation::Proceed after
#[tokio::test]
async fn blocks_until_saved() -> Result<(), AppError> {
    let test = TestBuilder::new().with_routing_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let registry = EditorRegistry::new(db.clone(), None, Duration::from_secs(60));
    let editor = registry.editor(USER_ID).await;
    editor.lock().await.select_guild(GUILD_A, channels()).await?;

    let guard = NavigationGuard::new(&registry);
    assert_eq!(guard.check(USER_ID).await, Navigation::Proceed);

    registry
        .queue_edit(USER_ID, GUILD_A, "c1".to_string(), "/a".to_string())
        .await?;

    assert_eq!(
        guard.check(USER_ID).await,
        Navigation::Block {
            dirty_guild_ids: vec![GUILD_A]
        }
    );

    assert!(matches!(
        editor.lock().await.save().await?,
        SaveOutcome::Saved(_)
    ));
    assert_eq!(guard.check(USER_ID).await, Navigation::Proceed);

    Ok(())
}
