use super::*;

/// Tests storing a document for a new user.
///
/// Expected: Ok with one record created
#[tokio::test]
async fn creates_new_document() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let mut config = UserConfig::empty(42);
    config.set_guild_routes(
        1001,
        StoredGuildRoutes {
            mapping: [("c1".to_string(), "/x".to_string())].into_iter().collect(),
            updated_at: chrono::Utc::now(),
        },
    );

    let repo = UserConfigRepository::new(db);
    let stored = repo.upsert(config).await?;

    assert_eq!(stored.user_id, 42);
    assert!(stored.guild_routes(1001).is_some());

    let count = entity::prelude::UserConfig::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}

/// Tests replacing an existing document while preserving keys the routing
/// engine does not own.
///
/// Expected: Ok with unrelated keys intact and a single record
#[tokio::test]
async fn replaces_existing_document() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    UserConfigFactory::new(db)
        .user_id("42")
        .document(serde_json::json!({ "theme": "dark" }))
        .build()
        .await?;

    let repo = UserConfigRepository::new(db);
    let mut config = repo.get_by_user_id(42).await?.unwrap();
    config.set_guild_routes(
        1001,
        StoredGuildRoutes {
            mapping: [("c1".to_string(), "/x".to_string())].into_iter().collect(),
            updated_at: chrono::Utc::now(),
        },
    );
    repo.upsert(config).await?;

    let reloaded = repo.get_by_user_id(42).await?.unwrap();
    assert_eq!(reloaded.document.get("theme"), Some(&serde_json::json!("dark")));
    assert!(reloaded.guild_routes(1001).is_some());

    let count = entity::prelude::UserConfig::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}
