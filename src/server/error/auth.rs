use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No authenticated user id is stored in the session.
    ///
    /// The platform's identity provider has not established a session for this
    /// request. Results in a 401 Unauthorized response.
    #[error("No authenticated user in session")]
    UserNotInSession,
}

/// Converts authentication errors into HTTP responses.
///
/// # Returns
/// - 401 Unauthorized - For `UserNotInSession`
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::UserNotInSession => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorDto {
                    error: "You must be logged in to edit channel routes.".to_string(),
                }),
            )
                .into_response(),
        }
    }
}
