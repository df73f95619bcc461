//! Bearer-token authentication extractor.
//!
//! Provides an extractor for requiring an authenticated user in route
//! handlers. Tokens travel in the `Authorization: Bearer <token>` header;
//! a missing, malformed, or expired token rejects the request with 401
//! before the handler runs.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use grindtrack_core::UserId;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(user_id): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, user {user_id}!")
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserId);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("No token".to_owned()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("No token".to_owned()))?;

        let user_id = state.tokens().validate(token)?;

        Ok(Self(user_id))
    }
}
