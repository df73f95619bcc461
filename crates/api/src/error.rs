//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is always `{"message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::email::EmailError;
use crate::services::token::TokenError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Bearer token missing, malformed, or expired.
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Verification email could not be sent.
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body sent to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
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

        let status = match &self {
            Self::Database(_) | Self::Internal(_) | Self::Email(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => auth_status(err),
            Self::Token(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) | Self::Email(_) => "Server error".to_string(),
            Self::Auth(err) => auth_message(err),
            Self::Token(_) => "Invalid token".to_string(),
            Self::NotFound(_) => "Not found".to_string(),
            Self::Unauthorized(msg) => msg.clone(),
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl AppError {
    /// Whether this error maps to a 500 response and should be captured.
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Internal(_) | Self::Email(_) => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::Repository(_)
                    | AuthError::Mailer(_)
                    | AuthError::PasswordHash
                    | AuthError::TokenSigning
            ),
            _ => false,
        }
    }
}

fn auth_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::EmailTaken
        | AuthError::InvalidEmail(_)
        | AuthError::WeakPassword(_)
        | AuthError::InvalidCredentials
        | AuthError::InvalidOtp
        | AuthError::OtpExpired => StatusCode::BAD_REQUEST,
        AuthError::NotVerified => StatusCode::FORBIDDEN,
        AuthError::Repository(_)
        | AuthError::Mailer(_)
        | AuthError::PasswordHash
        | AuthError::TokenSigning => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn auth_message(err: &AuthError) -> String {
    match err {
        AuthError::EmailTaken => "Email already registered".to_string(),
        AuthError::InvalidEmail(e) => e.to_string(),
        AuthError::WeakPassword(msg) => msg.clone(),
        AuthError::InvalidCredentials => "Invalid credentials".to_string(),
        AuthError::InvalidOtp => "Invalid OTP".to_string(),
        AuthError::OtpExpired => "OTP expired".to_string(),
        AuthError::NotVerified => "Email not verified".to_string(),
        AuthError::Repository(_)
        | AuthError::Mailer(_)
        | AuthError::PasswordHash
        | AuthError::TokenSigning => "Server error".to_string(),
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
