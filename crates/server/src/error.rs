//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, ServiceError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Service operation failed.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is the server's fault (reported to Sentry, details hidden).
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Internal(_) => true,
            Self::Service(err) => matches!(
                err,
                ServiceError::Repository(_)
                    | ServiceError::Auth(AuthError::PasswordHash | AuthError::Repository(_))
            ),
            Self::Auth(err) => matches!(err, AuthError::PasswordHash | AuthError::Repository(_)),
            Self::NotFound(_) | Self::Unauthorized(_) | Self::BadRequest(_) => false,
        }
    }

    fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        match self {
            Self::Service(err) => match err {
                ServiceError::DuplicateEmail(_) => StatusCode::CONFLICT,
                ServiceError::CustomerNotFound(_)
                | ServiceError::OrderHistory(_)
                | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::Auth(AuthError::InvalidEmail(_)) => StatusCode::BAD_REQUEST,
                _ => StatusCode::UNAUTHORIZED,
            },
            Self::Auth(AuthError::InvalidEmail(_)) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client.
    fn public_message(&self) -> String {
        if self.is_server_error() {
            return "Internal server error".to_string();
        }
        match self {
            Self::Service(err) => err.to_string(),
            // Never reveal whether the email exists
            Self::Auth(AuthError::InvalidEmail(_)) => "Invalid email address".to_string(),
            Self::Auth(_) => "Invalid credentials".to_string(),
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), self.public_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a successful login.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nighthawk_core::{CustomerId, Email, OrderHistoryError};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("customer 9".to_string());
        assert_eq!(err.to_string(), "Not found: customer 9");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(RepositoryError::NotFound.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_status_codes() {
        let duplicate = ServiceError::DuplicateEmail(Email::parse("toby@gmail.com").unwrap());
        assert_eq!(get_status(duplicate.into()), StatusCode::CONFLICT);

        let missing = ServiceError::CustomerNotFound(CustomerId::new(3));
        assert_eq!(get_status(missing.into()), StatusCode::BAD_REQUEST);

        let bad_history = ServiceError::OrderHistory(OrderHistoryError::EmptyDate);
        assert_eq!(get_status(bad_history.into()), StatusCode::BAD_REQUEST);

        let blank = ServiceError::Validation(crate::models::ValidationError::EmptyPassword);
        assert_eq!(get_status(blank.into()), StatusCode::BAD_REQUEST);

        let hashing = ServiceError::Auth(AuthError::PasswordHash);
        assert_eq!(get_status(hashing.into()), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_auth_errors_hide_user_existence() {
        let unknown = AppError::Auth(AuthError::UserNotFound("x@y.com".to_string()));
        let wrong = AppError::Auth(AuthError::InvalidCredentials);

        assert_eq!(unknown.public_message(), wrong.public_message());
        assert_eq!(get_status(unknown), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Internal("connection string leaked".to_string());
        assert_eq!(err.public_message(), "Internal server error");
    }
}
