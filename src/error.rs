use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::source::SourceError;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
        }
    }
}

impl From<SourceError> for ApiError {
    fn from(value: SourceError) -> Self {
        error!("Lesson source error: {value}");
        ApiError::Internal("Failed to fetch lessons".into())
    }
}
