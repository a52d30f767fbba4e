use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use trekflow_core::CoreError;
use trekflow_ledger::CancellationError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    /// Repository errors carry their own taxonomy; map it onto HTTP here
    /// rather than through the blanket `From`, which would flatten everything
    /// to a 500.
    pub fn from_core(err: CoreError) -> Self {
        match err {
            CoreError::NotFoundError(msg) => Self::NotFoundError(msg),
            CoreError::ValidationError(msg) => Self::ValidationError(msg),
            CoreError::ConflictError(msg) => Self::ConflictError(msg),
            CoreError::InternalError(msg) => Self::InternalServerError(msg),
        }
    }

    pub fn from_cancellation(err: CancellationError) -> Self {
        match err {
            CancellationError::BookingNotActive(id) => {
                Self::ConflictError(format!("Booking is not active: {}", id))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
