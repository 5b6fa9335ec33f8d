use super::*;

/// Tests finding a stored mapping by its (user, guild) key.
///
/// Verifies that the repository returns the stored record with its mapping parsed
/// into channel id → path entries.
///
/// Expected: Ok(Some) with the stored mapping
#[tokio::test]
async fn finds_existing_mapping() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ChannelRouteMapping)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    RouteMappingFactory::new(db)
        .user_id("42")
        .guild_id("1001")
        .route("c1", "/signals/usd")
        .route("c2", "/news")
        .build()
        .await?;

    let repo = RouteMappingRepository::new(db);
    let result = repo.find_by_user_and_guild(42, 1001).await?;

    assert!(result.is_some());
    let record = result.unwrap();
    assert_eq!(record.user_id, 42);
    assert_eq!(record.guild_id, 1001);
    assert_eq!(record.mapping.len(), 2);
    assert_eq!(record.mapping.get("c1").map(String::as_str), Some("/signals/usd"));
    assert_eq!(record.mapping.get("c2").map(String::as_str), Some("/news"));

    Ok(())
}

/// Tests lookups for a pair that was never saved.
///
/// Verifies that a record for the same guild but another user is not returned.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_other_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ChannelRouteMapping)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    RouteMappingFactory::new(db)
        .user_id("42")
        .guild_id("1001")
        .route("c1", "/x")
        .build()
        .await?;

    let repo = RouteMappingRepository::new(db);
    let result = repo.find_by_user_and_guild(43, 1001).await?;

    assert!(result.is_none());

    Ok(())
}

/// Tests that empty paths stored remotely are treated as unset.
///
/// Expected: Ok(Some) without the empty entry
#[tokio::test]
async fn drops_empty_paths() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ChannelRouteMapping)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    RouteMappingFactory::new(db)
        .user_id("42")
        .guild_id("1001")
        .route("c1", "/x")
        .route("c2", "")
        .build()
        .await?;

    let repo = RouteMappingRepository::new(db);
    let record = repo.find_by_user_and_guild(42, 1001).await?.unwrap();

    assert_eq!(record.mapping.len(), 1);
    assert!(!record.mapping.contains_key("c2"));

    Ok(())
}

/// Tests that a stored payload with non-string values is rejected.
///
/// Expected: Err(DbErr::Custom)
#[tokio::test]
async fn fails_for_malformed_payload() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ChannelRouteMapping)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let mut raw = serde_json::Map::new();
    raw.insert("c1".to_string(), serde_json::json!(17));

    RouteMappingFactory::new(db)
        .user_id("42")
        .guild_id("1001")
        .raw_mapping(raw)
        .build()
        .await?;

    let repo = RouteMappingRepository::new(db);
    let result = repo.find_by_user_and_guild(42, 1001).await;

    assert!(matches!(result, Err(sea_orm::DbErr::Custom(_))));

    Ok(())
}

/// Tests that querying a database without the route mapping table fails.
///
/// Expected: Err
#[tokio::test]
async fn fails_when_table_missing() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RouteMappingRepository::new(db);
    let result = repo.find_by_user_and_guild(42, 1001).await;

    assert!(result.is_err());

    Ok(())
}
