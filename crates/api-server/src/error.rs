use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rrg_core::RrgError;
use serde::Serialize;

/// Envelope for every JSON response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Rotation(RrgError),
}

impl From<RrgError> for AppError {
    fn from(e: RrgError) -> Self {
        AppError::Rotation(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Rotation(e @ RrgError::InvalidData(_)) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Rotation(e) if e.is_fatal() => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::Rotation(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        }

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}
