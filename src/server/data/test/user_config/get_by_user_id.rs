use super::*;

/// Tests reading a stored configuration document.
///
/// Expected: Ok(Some) with the document keys preserved
#[tokio::test]
async fn returns_stored_document() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    UserConfigFactory::new(db)
        .user_id("42")
        .document(serde_json::json!({
            "theme": "dark",
            "channelRoutes": {
                "1001": { "mapping": { "c1": "/x" }, "updatedAt": "2026-01-01T00:00:00Z" }
            }
        }))
        .build()
        .await?;

    let repo = UserConfigRepository::new(db);
    let config = repo.get_by_user_id(42).await?.unwrap();

    assert_eq!(config.user_id, 42);
    assert_eq!(config.document.get("theme"), Some(&serde_json::json!("dark")));

    let routes = config.guild_routes(1001).unwrap();
    assert_eq!(routes.mapping.get("c1").map(String::as_str), Some("/x"));

    Ok(())
}

/// Tests reading a document for a user who never saved one.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserConfigRepository::new(db);
    let config = repo.get_by_user_id(42).await?;

    assert!(config.is_none());

    Ok(())
}

/// Tests that a stored document which is not a JSON object is rejected.
///
/// Expected: Err(DbErr::Custom)
#[tokio::test]
async fn fails_for_non_object_document() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    UserConfigFactory::new(db)
        .user_id("42")
        .document(serde_json::json!(["not", "an", "object"]))
        .build()
        .await?;

    let repo = UserConfigRepository::new(db);
    let result = repo.get_by_user_id(42).await;

    assert!(matches!(result, Err(sea_orm::DbErr::Custom(_))));

    Ok(())
}
