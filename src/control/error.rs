//! Control API errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::layout::PlayError;
use crate::playlist::LoadError;

/// Every failure the control API reports to a caller.
///
/// All variants are client errors; the `Display` text is the response body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `POST /api/play` without a usable `module` query parameter.
    #[error("Expected module parameter")]
    MissingModule,

    /// The state machine refused the module. The cause is kept for logs
    /// but not exposed to callers.
    #[error("Unable to play module")]
    PlayRejected(#[source] PlayError),

    /// `module` was given more than once.
    #[error("Unable to play module")]
    ModuleNotUnique,

    /// Either loader stage rejected the posted configuration.
    #[error("Bad request: {0}")]
    BadConfig(#[from] LoadError),

    /// The request body could not be decoded into a `config` field.
    #[error("Bad request: {0}")]
    BadBody(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::PlaylistError;

    #[test]
    fn test_response_text() {
        assert_eq!(ApiError::MissingModule.to_string(), "Expected module parameter");
        assert_eq!(
            ApiError::PlayRejected(PlayError::QueueFull { capacity: 3 }).to_string(),
            "Unable to play module"
        );
        assert_eq!(ApiError::ModuleNotUnique.to_string(), "Unable to play module");
        assert_eq!(
            ApiError::from(LoadError::from(PlaylistError::Empty)).to_string(),
            "Bad request: Invalid playlist: playlist has no entries"
        );
    }

    #[test]
    fn test_every_variant_is_bad_request() {
        let response = ApiError::BadBody("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = ApiError::PlayRejected(PlayError::ModuleNotFound("x".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
