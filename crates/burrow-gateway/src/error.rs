use crate::model::ErrorResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_shortener::ShortenerError;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("url not found for short code: {0}")]
    NotFound(String),
    #[error("stored url for short code {0} is not a valid redirect target")]
    InvalidRedirect(String),
    #[error(transparent)]
    Shortener(ShortenerError),
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        match err {
            ShortenerError::NotFound(code) => AppError::NotFound(code),
            other => AppError::Shortener(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRedirect(_) | AppError::Shortener(_) => {
                error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match self {
            AppError::BadRequest(_) | AppError::NotFound(_) => self.to_string(),
            _ => "internal server error".to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Turns a handler panic into the regular JSON 500 response.
pub(crate) fn handle_panic(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic payload"
    };
    error!(panic = %detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal server error".to_string(),
        }),
    )
        .into_response()
}
