use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message safe to show to the person who triggered the error.
    ///
    /// Store failures (including Postgres ones) arrive as
    /// `ExternalServiceError` with the store's own text.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::ExternalServiceError(msg) => msg.clone(),
        }
    }

    /// Log server-side failures; client errors are not worth an error line
    pub fn log(&self) {
        match self {
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            AppError::ExternalServiceError(msg) => {
                tracing::error!("External service error: {}", msg)
            }
            _ => {}
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let errors = match self {
            AppError::Validation(ref msg) => Some(vec![msg.clone()]),
            _ => None,
        };
        let body = Json(ApiResponse::<()>::error(Some(self.user_message()), errors));

        (self.status_code(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
