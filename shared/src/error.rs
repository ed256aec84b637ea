use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("{0}")]
    UnprocessableRequest(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    SlotMismatch(String),
    #[error("already booked")]
    DuplicateBooking,
    #[error("fully booked")]
    CapacityExceeded,
    #[error("transaction could not be completed")]
    TransactionError(#[source] sqlx::Error),
    #[error("database error")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::UnprocessableRequest(_)
            | AppError::SlotMismatch(_) => StatusCode::BAD_REQUEST,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateBooking | AppError::CapacityExceeded => StatusCode::CONFLICT,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Storage failures leave no partial effect, so the whole request may be retried.
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::TransactionError(_) | AppError::SpecificOperationError(_)
        )
    }

    fn details(&self) -> String {
        match self {
            AppError::TransactionError(e) | AppError::SpecificOperationError(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    fn body(&self) -> serde_json::Value {
        if self.status_code().is_server_error() {
            json!({ "error": self.to_string(), "details": self.details() })
        } else {
            json!({ "error": self.to_string() })
        }
    }
}

// Bodies that cannot be decoded are reported like any other malformed input.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::UnprocessableRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::UnprocessableRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                retryable = self.is_retryable(),
                "Unexpected error happened"
            );
        }

        (status_code, Json(self.body())).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
