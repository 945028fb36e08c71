//! Admin authentication error types.

use thiserror::Error;

/// Errors that can occur during admin authentication.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Wrong username or password. Deliberately does not say which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bearer token missing, unknown, expired or revoked.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The configured hash could not be parsed or hashing failed.
    #[error("password hashing error")]
    PasswordHash,

    /// Token lifetime does not fit in a timestamp.
    #[error("token lifetime out of range")]
    TokenLifetime,
}
