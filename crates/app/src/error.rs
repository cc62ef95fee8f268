//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers should
//! return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use growth_labs_core::wizard::{FieldError, WizardError};

use crate::engine::EngineError;

/// Application-level error type for the frontend service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Super Engine API operation failed.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// A wizard step's validation predicate failed.
    #[error("Validation error: {0}")]
    Validation(#[from] FieldError),

    /// A wizard transition was rejected.
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A dependency is temporarily unavailable.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    /// Present for validation failures so the client can mark the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Engine(_) | Self::Session(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Engine(err) => match err.status() {
                // The engine's 404s pass through: the resource is absent
                Some(404) => StatusCode::NOT_FOUND,
                Some(401 | 403) => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) | Self::Wizard(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        // Don't expose internal error details to clients
        let (message, field) = match &self {
            Self::Engine(err) => match err.status() {
                Some(404) => ("Not found".to_string(), None),
                Some(401 | 403) => ("Your session is no longer valid".to_string(), None),
                _ => ("Upstream service error".to_string(), None),
            },
            Self::Session(_) | Self::Internal(_) => ("Internal server error".to_string(), None),
            Self::Validation(err) => (err.message.clone(), Some(err.field.clone())),
            Self::Wizard(WizardError::Invalid(err)) => {
                (err.message.clone(), Some(err.field.clone()))
            }
            Self::Wizard(err) => (err.to_string(), None),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::BadRequest(msg)
            | Self::Unavailable(msg) => (msg.clone(), None),
        };

        (status, Json(ErrorBody { error: message, field })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("campaign cmp_1".to_string());
        assert_eq!(err.to_string(), "Not found: campaign cmp_1");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("x".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Unavailable("x".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_errors_are_422() {
        let err = AppError::Validation(FieldError::new("endDate", "end date before start"));
        assert_eq!(get_status(err), StatusCode::UNPROCESSABLE_ENTITY);

        let err = AppError::Wizard(WizardError::NotAtFinalStep { current: 1 });
        assert_eq!(get_status(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_engine_status_mapping() {
        let not_found = AppError::Engine(EngineError::Status {
            status: 404,
            retry_after: None,
            message: String::new(),
        });
        assert_eq!(get_status(not_found), StatusCode::NOT_FOUND);

        let forbidden = AppError::Engine(EngineError::Status {
            status: 403,
            retry_after: None,
            message: String::new(),
        });
        assert_eq!(get_status(forbidden), StatusCode::UNAUTHORIZED);

        let server = AppError::Engine(EngineError::Status {
            status: 500,
            retry_after: None,
            message: String::new(),
        });
        assert_eq!(get_status(server), StatusCode::BAD_GATEWAY);
    }
}
