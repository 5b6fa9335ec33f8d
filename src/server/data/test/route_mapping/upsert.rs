use super::*;

fn mapping(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(channel, path)| (channel.to_string(), path.to_string()))
        .collect()
}

/// Tests creating a new remote mapping record.
///
/// Verifies that the repository inserts a record when none exists for the pair
/// and stores the mapping as a flat JSON object.
///
/// Expected: Ok with new record created
#[tokio::test]
async fn creates_new_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ChannelRouteMapping)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RouteMappingRepository::new(db);
    let record = repo
        .upsert(UpsertRouteMappingParam {
            user_id: 42,
            guild_id: 1001,
            mapping: mapping(&[("c1", "/a"), ("c2", "/b")]),
        })
        .await?;

    assert_eq!(record.user_id, 42);
    assert_eq!(record.guild_id, 1001);
    assert_eq!(record.mapping, mapping(&[("c1", "/a"), ("c2", "/b")]));

    let stored = entity::prelude::ChannelRouteMapping::find()
        .one(db)
        .await?
        .unwrap();
    let payload: serde_json::Value = serde_json::from_str(&stored.mapping).unwrap();
    assert_eq!(payload, serde_json::json!({ "c1": "/a", "c2": "/b" }));

    Ok(())
}

/// Tests overwriting an existing remote mapping record.
///
/// Verifies that the whole mapping is replaced, no duplicate row is created and
/// the timestamp moves forward.
///
/// Expected: Ok with single record holding the new mapping
#[tokio::test]
async fn overwrites_existing_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ChannelRouteMapping)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let old_timestamp = chrono::Utc::now() - chrono::Duration::hours(1);
    RouteMappingFactory::new(db)
        .user_id("42")
        .guild_id("1001")
        .route("c1", "/old")
        .route("c9", "/gone")
        .updated_at(old_timestamp)
        .build()
        .await?;

    let repo = RouteMappingRepository::new(db);
    let record = repo
        .upsert(UpsertRouteMappingParam {
            user_id: 42,
            guild_id: 1001,
            mapping: mapping(&[("c1", "/new")]),
        })
        .await?;

    assert_eq!(record.mapping, mapping(&[("c1", "/new")]));
    assert!(record.updated_at > old_timestamp);

    let count = entity::prelude::ChannelRouteMapping::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}

/// Tests that records of different guilds for the same user stay independent.
///
/// Expected: Ok with two records
#[tokio::test]
async fn keeps_guilds_separate() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ChannelRouteMapping)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RouteMappingRepository::new(db);
    repo.upsert(UpsertRouteMappingParam {
        user_id: 42,
        guild_id: 1001,
        mapping: mapping(&[("c1", "/a")]),
    })
    .await?;
    repo.upsert(UpsertRouteMappingParam {
        user_id: 42,
        guild_id: 1002,
        mapping: mapping(&[("c1", "/b")]),
    })
    .await?;

    let count = entity::prelude::ChannelRouteMapping::find().count(db).await?;
    assert_eq!(count, 2);

    let first = repo.find_by_user_and_guild(42, 1001).await?.unwrap();
    assert_eq!(first.mapping, mapping(&[("c1", "/a")]));

    Ok(())
}
