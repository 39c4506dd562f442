//! Application error type mapping to HTTP status codes.
//!
//! Every failure is rendered as `{"error": {"code": ..., "message": ...}}`.
//! Storage failures are logged here and reach the client only as a generic
//! `INTERNAL_ERROR`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use roster_types::error::{ErrorCode, ServiceError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Error returned by a service operation.
    Service(ServiceError),
    /// Request body or query string could not be decoded.
    InvalidInput(String),
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::Service(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::InvalidInput(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::InvalidInput(e.body_text())
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::TeamExists | ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::PrExists
        | ErrorCode::PrMerged
        | ErrorCode::NotAssigned
        | ErrorCode::NoCandidate => StatusCode::CONFLICT,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Service(ServiceError::Domain { code, message }) => {
                (status_for(code), code.as_str(), message)
            }
            AppError::Service(err @ ServiceError::Storage { .. }) => {
                tracing::error!(error = %err, "request failed on storage");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal server error".to_string(),
                )
            }
            AppError::InvalidInput(message) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidInput.as_str(),
                message,
            ),
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
