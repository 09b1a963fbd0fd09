use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_types::CoreError;
use database::DbError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(#[from] CoreError),
    #[error("Invalid path parameter: {0}")]
    Path(#[from] PathRejection),
    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Maps a repository `NotFound` onto a message naming what was looked up.
    pub fn not_found(what: impl FnOnce() -> String) -> impl FnOnce(DbError) -> AppError {
        move |err| match err {
            DbError::NotFound => AppError::NotFound(what()),
            other => AppError::Database(other),
        }
    }
}

/// The body of every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_values: Option<Vec<&'static str>>,
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, accepted_values) = match self {
            AppError::Validation(err) => {
                tracing::debug!(error = %err, "Rejected request.");
                let accepted = err.accepted_values();
                (StatusCode::BAD_REQUEST, err.to_string(), accepted)
            }
            AppError::Path(rejection) => (StatusCode::BAD_REQUEST, rejection.body_text(), None),
            AppError::Query(rejection) => (StatusCode::BAD_REQUEST, rejection.body_text(), None),
            AppError::Body(rejection) => (rejection.status(), rejection.body_text(), None),
            AppError::Database(DbError::NotFound) => {
                (StatusCode::NOT_FOUND, "Not found".to_string(), None)
            }
            AppError::Database(db_err) if db_err.is_unavailable() => {
                tracing::error!(error = ?db_err, "Database unavailable.");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The service is temporarily unavailable".to_string(),
                    None,
                )
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
        };

        let body = Json(ErrorBody {
            error,
            accepted_values,
        });
        (status, body).into_response()
    }
}
