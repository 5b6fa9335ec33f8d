use tower_sessions::Session;

use crate::server::{
    error::{auth::AuthError, AppError},
    middleware::session::AuthSession,
};

/// Guard for endpoints that require an authenticated user.
pub struct AuthGuard<'a> {
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Requires a user in the session.
    ///
    /// # Returns
    /// - `Ok(u64)` - Discord id of the authenticated user
    /// - `Err(AppError::AuthErr(UserNotInSession))` - No user in the session
    pub async fn require_user(&self) -> Result<u64, AppError> {
        let Some(user_id) = AuthSession::new(self.session).get_user_id().await? else {
            return Err(AuthError::UserNotInSession.into());
        };

        Ok(user_id)
    }
}
