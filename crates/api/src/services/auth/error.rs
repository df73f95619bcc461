//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] grindtrack_core::EmailError),

    /// Email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Invalid credentials (wrong password or unknown email).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// One-time code missing or mismatched.
    #[error("invalid one-time code")]
    InvalidOtp,

    /// One-time code matched but its validity window has passed.
    #[error("one-time code expired")]
    OtpExpired,

    /// Account exists but the email has not been verified.
    #[error("email not verified")]
    NotVerified,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Verification email could not be delivered.
    #[error("email delivery error: {0}")]
    Mailer(#[from] crate::services::email::EmailError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Bearer token could not be signed.
    #[error("token signing error")]
    TokenSigning,
}
