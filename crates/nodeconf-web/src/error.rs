//! Mapping of settings errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use nodeconf_core::{FormErrors, LoadError, SaveError};
use thiserror::Error;

/// Errors returned by the configuration routes.
#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Form(#[from] FormErrors),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Load(LoadError::Open { .. }) => StatusCode::NOT_FOUND,
            WebError::Load(LoadError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            WebError::Load(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WebError::Save(SaveError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            WebError::Save(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Form(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({ "error": self.to_string() });
        if let WebError::Form(FormErrors(fields)) = &self {
            body["fields"] = fields
                .iter()
                .map(|f| serde_json::json!({ "field": f.field, "message": f.to_string() }))
                .collect();
        }
        (self.status(), Json(body)).into_response()
    }
}
