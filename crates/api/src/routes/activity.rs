//! Activity route handler.

use axum::{Json, extract::State};
use chrono::Utc;

use grindtrack_core::ActivitySummary;

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Solved-count heatmap data for the trailing 365 days.
///
/// GET /activity
///
/// # Errors
///
/// Returns 500 on repository failure.
pub async fn activity(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ActivitySummary>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".to_owned()))?;

    Ok(Json(user.progress.activity(Utc::now())))
}
