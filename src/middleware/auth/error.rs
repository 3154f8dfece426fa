use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::auth::ValidationError;

/// Why the payload segment of a bearer token could not be read.
///
/// All variants produce the same response; the distinction is for logs only.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed structure")]
    MalformedStructure,

    #[error("bad encoding")]
    BadEncoding(#[source] base64::DecodeError),

    #[error("bad payload")]
    BadPayload(#[source] serde_json::Error),
}

/// Request authentication failure.
///
/// Every variant becomes `401 Unauthorized` with a fixed JSON string body;
/// the wrapped reason is only ever logged.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("extracting bearer token from authorization header failed")]
    Extraction,

    #[error("failed to validate bearer token")]
    Validation(#[source] ValidationError),

    #[error("failed to decode token payload")]
    Decode(#[from] DecodeError),
}

impl GateError {
    /// Short label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            GateError::Extraction => "extraction",
            GateError::Validation(_) => "validation",
            GateError::Decode(_) => "decode",
        }
    }

    /// Client-facing body. Never includes the underlying reason.
    pub fn public_message(&self) -> &'static str {
        match self {
            GateError::Extraction => "Authentication failed",
            GateError::Validation(_) => "Invalid JWT token",
            GateError::Decode(_) => "Parsing token failed",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self.public_message())).into_response()
    }
}
