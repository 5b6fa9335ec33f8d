use super::*;

/// Tests requiring a user when one is stored in the session.
///
/// Expected: Ok with the stored Discord id
#[tokio::test]
async fn returns_user_in_session() -> Result<(), AppError> {
    let mut test = TestBuilder::new().build().await.unwrap();
    let session = test.session().await.unwrap();

    AuthSession::new(session).set_user_id(123456789).await?;

    let user_id = AuthGuard::new(session).require_user().await?;

    assert_eq!(user_id, 123456789);

    Ok(())
}

/// Tests requiring a user on an anonymous session.
///
/// Expected: Err(AuthError::UserNotInSession)
#[tokio::test]
async fn fails_without_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new().build().await.unwrap();
    let session = test.session().await.unwrap();

    let result = AuthGuard::new(session).require_user().await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInSession))
    ));

    Ok(())
}
