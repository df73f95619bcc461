//! Authentication route handlers.
//!
//! JSON endpoints for the signup → verify → login flow. These are the only
//! routes that do not require a bearer token.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::auth::{AuthService, VerifyOutcome};
use crate::state::AppState;

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

/// Verification request body.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub otp: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Bearer token response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Response from the verify endpoint.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum VerifyResponse {
    Token(TokenResponse),
    Message(MessageResponse),
}

/// Register a new account and dispatch its verification code.
///
/// POST /auth/signup
///
/// # Errors
///
/// Returns 400 for a taken email, invalid email, or weak password.
pub async fn signup(
    State(state): State<AppState>,
    body: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(req) = body?;
    let auth = AuthService::new(state.pool(), state.mailer(), state.tokens());
    auth.signup(&req.email, &req.password).await?;

    Ok(Json(MessageResponse::new("OTP sent to email")))
}

/// Check a verification code and issue a bearer token.
///
/// POST /auth/verify
///
/// # Errors
///
/// Returns 400 on code mismatch or expiry.
pub async fn verify(
    State(state): State<AppState>,
    body: std::result::Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>> {
    let Json(req) = body?;
    let auth = AuthService::new(state.pool(), state.mailer(), state.tokens());

    let response = match auth.verify(&req.email, &req.otp).await? {
        VerifyOutcome::Verified(token) => VerifyResponse::Token(TokenResponse { token }),
        VerifyOutcome::AlreadyVerified => {
            VerifyResponse::Message(MessageResponse::new("Already verified"))
        }
    };

    Ok(Json(response))
}

/// Login with email and password.
///
/// POST /auth/login
///
/// # Errors
///
/// Returns 400 on unknown email or wrong password, 403 for an unverified
/// account.
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(req) = body?;
    let auth = AuthService::new(state.pool(), state.mailer(), state.tokens());
    let token = auth.login(&req.email, &req.password).await?;

    Ok(Json(TokenResponse { token }))
}
