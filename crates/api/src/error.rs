use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use greenlight_core::error::CoreError;
use greenlight_db::DbError;
use serde_json::{json, Value};

/// Message returned for every storage failure. The real cause is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

const NOT_FOUND_MESSAGE: &str = "the requested resource could not be found";

const EDIT_CONFLICT_MESSAGE: &str =
    "unable to update the record due to an edit conflict, please try again";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`DbError`] for repository failures,
/// and adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{ "error": ..., "code": ... }` JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `greenlight_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A repository error from `greenlight_db`.
    #[error(transparent)]
    Database(#[from] DbError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No route or resource matches the request.
    #[error("Resource not found")]
    ResourceNotFound,

    /// The route exists but not for this method.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message): (StatusCode, &str, Value) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(errors) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    json!(errors),
                ),
                CoreError::InvalidRuntimeFormat => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", core.to_string().into())
                }
            },

            // --- Repository errors ---
            AppError::Database(err) => classify_db_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone().into()),
            AppError::ResourceNotFound => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", NOT_FOUND_MESSAGE.into())
            }
            AppError::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                format!("the {method} method is not supported for this resource").into(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_error()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal_error() -> (StatusCode, &'static str, Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_ERROR_MESSAGE.into(),
    )
}

/// Classify a repository error into an HTTP status, error code, and message.
///
/// - `NotFound` maps to 404.
/// - `EditConflict` maps to 409.
/// - Everything else is logged in full and maps to a sanitized 500.
fn classify_db_error(err: &DbError) -> (StatusCode, &'static str, Value) {
    match err {
        DbError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", NOT_FOUND_MESSAGE.into()),
        DbError::EditConflict => (
            StatusCode::CONFLICT,
            "EDIT_CONFLICT",
            EDIT_CONFLICT_MESSAGE.into(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            internal_error()
        }
    }
}
