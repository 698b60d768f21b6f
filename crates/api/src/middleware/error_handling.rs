//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! endpoint fails the same way.
//!
//! | Error | Status | Body |
//! |---|---|---|
//! | `Unauthenticated` | 401 | `{"error": "Unauthorized"}` |
//! | `Validation` | 400 | `{"error": "Invalid data", "details": [...]}` |
//! | `NotFound` | 404 | `{"error": <message>}` |
//! | `Precondition` | 400 | `{"error": <message>}` |
//! | `Database`, `Internal` | 500 | `{"error": "Internal server error"}` |
//!
//! Upstream failures are logged in full and never echoed to the client.

use agenda_core::{
    errors::AgendaError,
    validation::{ValidationErrors, ValidationIssue},
};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use agenda_api::middleware::error_handling::AppError;
/// use agenda_core::errors::AgendaError;
///
/// fn lookup(found: bool) -> Result<(), AppError> {
///     if !found {
///         return Err(AgendaError::NotFound("Service not found".to_string()).into());
///     }
///     Ok(())
/// }
/// # fn main() { assert!(lookup(false).is_err()); }
/// ```
#[derive(Debug)]
pub struct AppError(pub AgendaError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            AgendaError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" })),
            AgendaError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid data", "details": errors }),
            ),
            AgendaError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            AgendaError::Precondition(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            upstream @ (AgendaError::Database(_) | AgendaError::Internal(_)) => {
                error!("Request failed: {:?}", upstream);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Allows `?` on `Result<T, AgendaError>` inside handlers
impl From<AgendaError> for AppError {
    fn from(err: AgendaError) -> Self {
        AppError(err)
    }
}

/// Store failures surface as `AgendaError::Database`
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(AgendaError::Database(err))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError(AgendaError::Validation(errors))
    }
}

/// A body that is not JSON, or not a JSON object, is reported like any other
/// validation failure, at the document root.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let issue = ValidationIssue::new(Vec::new(), rejection.body_text());
        AppError(AgendaError::Validation(issue.into()))
    }
}

/// Maps an AgendaError to an HTTP response
pub fn map_error(err: AgendaError) -> Response {
    AppError(err).into_response()
}
