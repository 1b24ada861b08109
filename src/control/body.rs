//! Request body decoding for `POST /api/config`.

use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::Deserialize;

use crate::control::error::ApiError;

#[derive(Debug, Deserialize)]
struct ConfigForm {
    config: String,
}

/// The raw `config` field of a config update, from either a urlencoded form
/// or a JSON object.
#[derive(Debug)]
pub struct ConfigUpdate(pub String);

impl<S> FromRequest<S> for ConfigUpdate
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);

        let form = if is_json {
            Json::<ConfigForm>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadBody(e.body_text()))?
                .0
        } else {
            Form::<ConfigForm>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadBody(e.body_text()))?
                .0
        };

        Ok(Self(form.config))
    }
}
