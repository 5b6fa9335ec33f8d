use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

/// Errors raised by routing editor operations.
///
/// Path validation failures and duplicate paths are not errors; they are
/// returned as data from the save operation. These variants cover requests the
/// editor cannot act on at all.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RoutingError {
    /// An operation needs an active guild but none has been selected.
    #[error("No guild is selected")]
    NoGuildSelected,

    /// The guild has not been loaded into the editor during this session.
    #[error("Guild {0} has not been loaded")]
    GuildNotLoaded(u64),

    /// A bulk operation referenced channels that are not in the guild's channel list.
    ///
    /// The whole operation is rejected; no channel is updated.
    #[error("Unknown channel ids: {}", .0.join(", "))]
    UnknownChannels(Vec<String>),

    /// A bulk pattern has no literal prefix to match against.
    #[error("Invalid channel name pattern '{0}'")]
    InvalidPattern(String),

    /// An imported mapping payload could not be parsed.
    ///
    /// The import is rejected wholesale; no entry is applied.
    #[error("Malformed route import: {0}")]
    MalformedImport(String),
}

/// Converts routing errors into HTTP responses.
///
/// # Returns
/// - 409 Conflict - For `NoGuildSelected` / `GuildNotLoaded`, the client must select the guild first
/// - 400 Bad Request - For unknown channels, invalid patterns and malformed imports
impl IntoResponse for RoutingError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NoGuildSelected | Self::GuildNotLoaded(_) => StatusCode::CONFLICT,
            Self::UnknownChannels(_) | Self::InvalidPattern(_) | Self::MalformedImport(_) => {
                StatusCode::BAD_REQUEST
            }
        };

        (
            status,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
