use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{0}")]
    Validation(String),

    #[error("invalid date format, expected YYYY-MM-DD")]
    InvalidDay,

    #[error("cannot request slots for a day in the past")]
    DayInPast,

    #[error("day unavailable")]
    DayBlocked,

    #[error("a booking already exists for this slot")]
    SlotTaken,

    #[error("incorrect email or password")]
    InvalidCredentials,

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_)
            | AppError::InvalidDay
            | AppError::DayInPast
            | AppError::SlotTaken
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::DayBlocked => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
