//! Error responses for the HTTP surface.
//!
//! Every failure maps to a fixed status and a fixed `{"error": "<code>"}`
//! body. Internal messages are logged, never returned.

use aicart_access::AccessError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Missing or invalid bearer token.
    #[error("unauthorized")]
    Unauthorized,

    /// Valid session without the required role.
    #[error("forbidden")]
    Forbidden,

    /// Request body could not be parsed.
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Access(err) => match err {
                AccessError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AccessError::EmailTaken => StatusCode::CONFLICT,
                AccessError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                AccessError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                AccessError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Access(err) => err.code(),
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden => "forbidden",
            ApiError::MalformedRequest(_) => "invalid_input",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, detail = ?self, "request failed");
        }
        (status, Json(json!({ "error": self.code() }))).into_response()
    }
}
