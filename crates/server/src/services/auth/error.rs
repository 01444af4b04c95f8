//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] nighthawk_core::EmailError),

    /// Wrong password, or no usable password on record.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No customer matches the username.
    #[error("user not found with username: {0}")]
    UserNotFound(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
