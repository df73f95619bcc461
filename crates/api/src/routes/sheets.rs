//! Sheet route handlers.
//!
//! The listing and detail views join the shared catalog against the
//! caller's sparse progress overlay; the toggle endpoint is the only
//! mutation of that overlay.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use grindtrack_core::{
    Difficulty, Problem, ProblemId, ProgressKey, SheetId, SheetKind, ToggleUpdate,
    progress_percent,
};

use crate::db::sheets::{SheetPatch, SheetRepository};
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Sheet, User};
use crate::routes::auth::MessageResponse;
use crate::state::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// One row of the sheet listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSummary {
    pub id: SheetId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: SheetKind,
    pub problems_count: usize,
    pub progress: u8,
}

/// Full sheet body returned by create/update.
#[derive(Debug, Serialize)]
pub struct SheetResponse {
    pub id: SheetId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: SheetKind,
    pub problems: Vec<Problem>,
}

impl From<Sheet> for SheetResponse {
    fn from(sheet: Sheet) -> Self {
        Self {
            id: sheet.id,
            title: sheet.title,
            description: sheet.description,
            kind: sheet.kind,
            problems: sheet.problems,
        }
    }
}

/// A catalog problem merged with the caller's overlay state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemView {
    /// Position in the catalog at read time; not stable across edits.
    pub index: usize,
    pub id: ProblemId,
    pub title: String,
    pub link: String,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub solved: bool,
    pub is_starred: bool,
    pub notes: String,
}

/// Sheet detail: catalog merged with the caller's overlay.
#[derive(Debug, Serialize)]
pub struct SheetDetailResponse {
    pub id: SheetId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: SheetKind,
    pub problems: Vec<ProblemView>,
}

/// A problem supplied by the client on create/update.
///
/// Entries without an `id` get a fresh one; difficulty defaults to Easy.
#[derive(Debug, Deserialize)]
pub struct ProblemInput {
    pub id: Option<ProblemId>,
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topic: Option<String>,
}

impl From<ProblemInput> for Problem {
    fn from(input: ProblemInput) -> Self {
        Self {
            id: input.id.unwrap_or_else(ProblemId::generate),
            title: input.title,
            link: input.link,
            difficulty: input.difficulty,
            topic: input.topic,
        }
    }
}

/// Create-sheet request body.
#[derive(Debug, Deserialize)]
pub struct CreateSheetRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub problems: Vec<ProblemInput>,
}

/// Update-sheet request body; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateSheetRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub problems: Option<Vec<ProblemInput>>,
}

/// Toggle request body; only present fields are applied.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub problem_index: usize,
    pub solved: Option<bool>,
    pub star: Option<bool>,
    pub note: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List every sheet with the caller's progress percentage.
///
/// GET /sheets
///
/// # Errors
///
/// Returns 500 on repository failure.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<SheetSummary>>> {
    let sheets = SheetRepository::new(state.pool()).list_all().await?;
    let user = load_user(&state, user_id).await?;

    // One pass over the overlay, then O(1) per sheet
    let solved_counts = user.progress.solved_counts();

    let summaries = sheets
        .into_iter()
        .map(|sheet| {
            let total = sheet.problems.len();
            let solved = solved_counts.get(&sheet.id).copied().unwrap_or(0);
            SheetSummary {
                id: sheet.id,
                title: sheet.title,
                description: sheet.description,
                kind: sheet.kind,
                problems_count: total,
                progress: progress_percent(solved, total),
            }
        })
        .collect();

    Ok(Json(summaries))
}

/// Create a custom sheet.
///
/// POST /sheets
///
/// # Errors
///
/// Returns 400 if the title is already taken.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    body: std::result::Result<Json<CreateSheetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SheetResponse>)> {
    let Json(req) = body?;
    let problems: Vec<Problem> = req.problems.into_iter().map(Into::into).collect();

    let sheet = SheetRepository::new(state.pool())
        .create(&req.title, &req.description, SheetKind::Custom, &problems)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::Conflict(msg) => AppError::BadRequest(msg),
            other => AppError::Database(other),
        })?;

    Ok((StatusCode::CREATED, Json(sheet.into())))
}

/// Sheet detail with the caller's solved/starred/notes overlay.
///
/// GET /sheets/{id}
///
/// # Errors
///
/// Returns 404 for an unknown sheet.
pub async fn detail(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<SheetId>,
) -> Result<Json<SheetDetailResponse>> {
    let sheet = SheetRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sheet {id}")))?;
    let user = load_user(&state, user_id).await?;

    let problems = sheet
        .problems
        .iter()
        .enumerate()
        .map(|(index, problem)| {
            let key = ProgressKey::new(sheet.id, problem.id);
            let entry = user.progress.get(&key).cloned().unwrap_or_default();
            ProblemView {
                index,
                id: problem.id,
                title: problem.title.clone(),
                link: problem.link.clone(),
                difficulty: problem.difficulty,
                topic: problem.topic.clone(),
                solved: entry.status.is_solved(),
                is_starred: entry.is_starred,
                notes: entry.notes,
            }
        })
        .collect();

    Ok(Json(SheetDetailResponse {
        id: sheet.id,
        title: sheet.title,
        description: sheet.description,
        kind: sheet.kind,
        problems,
    }))
}

/// Apply a partial solved/starred/notes update for one problem.
///
/// POST /sheets/{id}/toggle
///
/// # Errors
///
/// Returns 404 for an unknown sheet, 400 for an out-of-range index.
pub async fn toggle(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<SheetId>,
    body: std::result::Result<Json<ToggleRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(req) = body?;

    let sheet = SheetRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sheet {id}")))?;

    let problem = sheet
        .problem_at(req.problem_index)
        .ok_or_else(|| AppError::BadRequest("Invalid problem index".to_owned()))?;

    let mut user = load_user(&state, user_id).await?;

    let update = ToggleUpdate {
        solved: req.solved,
        star: req.star,
        note: req.note,
    };
    user.progress
        .apply(ProgressKey::new(sheet.id, problem.id), &update, Utc::now());

    UserRepository::new(state.pool())
        .save_progress(user.id, &user.progress)
        .await?;

    Ok(Json(MessageResponse::new("Updated")))
}

/// Partially update a sheet.
///
/// PUT /sheets/{id}
///
/// # Errors
///
/// Returns 404 for an unknown sheet, 400 for a title collision.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(id): Path<SheetId>,
    body: std::result::Result<Json<UpdateSheetRequest>, JsonRejection>,
) -> Result<Json<SheetResponse>> {
    let Json(req) = body?;
    let patch = SheetPatch {
        title: req.title,
        description: req.description,
        problems: req
            .problems
            .map(|problems| problems.into_iter().map(Into::into).collect()),
    };

    let sheet = SheetRepository::new(state.pool())
        .update(id, patch)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound(format!("sheet {id}")),
            crate::db::RepositoryError::Conflict(msg) => AppError::BadRequest(msg),
            other => AppError::Database(other),
        })?;

    Ok(Json(sheet.into()))
}

/// Delete a sheet and prune the caller's overlay entries for it.
///
/// DELETE /sheets/{id}
///
/// # Errors
///
/// Returns 500 on repository failure.
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<SheetId>,
) -> Result<Json<MessageResponse>> {
    SheetRepository::new(state.pool()).delete(id).await?;

    // Overlay entries keyed on the deleted sheet would otherwise orphan
    // permanently; drop the caller's now.
    let mut user = load_user(&state, user_id).await?;
    if user.progress.remove_sheet(id) > 0 {
        UserRepository::new(state.pool())
            .save_progress(user.id, &user.progress)
            .await?;
    }

    Ok(Json(MessageResponse::new("Deleted")))
}

/// Fetch the authenticated user or 401 if the account vanished.
async fn load_user(state: &AppState, user_id: grindtrack_core::UserId) -> Result<User> {
    UserRepository::new(state.pool())
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".to_owned()))
}
