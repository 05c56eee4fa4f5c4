//! Typed errors and HTTP mapping. Every user-visible failure serializes as
//! `{"success": false, "message": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Authentication required")]
    Unauthorized,
    /// Store reported a sentinel failure for a write. The store has already
    /// logged the underlying cause; the client sees only this message.
    #[error("{0}")]
    Failed(String),
    #[error("Server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) | AppError::Failed(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            success: false,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
