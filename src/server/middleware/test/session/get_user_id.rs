use super::*;

/// Tests reading the user id from an anonymous session.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_when_not_logged_in() -> Result<(), AppError> {
    let mut test = TestBuilder::new().build().await.unwrap();
    let session = test.session().await.unwrap();

    let user_id = AuthSession::new(session).get_user_id().await?;

    assert!(user_id.is_none());

    Ok(())
}

/// Tests that an id written by the identity provider as a string is parsed.
///
/// Expected: Ok(Some) with the numeric id
#[tokio::test]
async fn parses_stored_string_id() -> Result<(), AppError> {
    let mut test = TestBuilder::new().build().await.unwrap();
    let session = test.session().await.unwrap();

    session
        .insert(SESSION_AUTH_USER_ID, "987654321".to_string())
        .await?;

    let user_id = AuthSession::new(session).get_user_id().await?;

    assert_eq!(user_id, Some(987654321));

    Ok(())
}

/// Tests that a non-numeric stored id is reported as an internal error.
///
/// Expected: Err(AppError::InternalErr)
#[tokio::test]
async fn fails_for_non_numeric_id() -> Result<(), AppError> {
    let mut test = TestBuilder::new().build().await.unwrap();
    let session = test.session().await.unwrap();

    session
        .insert(SESSION_AUTH_USER_ID, "not-a-number".to_string())
        .await?;

    let result = AuthSession::new(session).get_user_id().await;

    assert!(matches!(result, Err(AppError::InternalErr(_))));

    Ok(())
}
