//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Auth (no token required)
//! POST /auth/signup            - Register, dispatch verification code
//! POST /auth/verify            - Check code, issue bearer token
//! POST /auth/login             - Issue bearer token
//!
//! # Sheets (bearer token required)
//! GET    /sheets               - Listing with per-user progress
//! POST   /sheets               - Create a custom sheet
//! GET    /sheets/{id}          - Catalog merged with the caller's overlay
//! POST   /sheets/{id}/toggle   - Mutate solved/starred/notes state
//! PUT    /sheets/{id}          - Partial update
//! DELETE /sheets/{id}          - Delete, pruning the caller's overlay
//!
//! # Activity (bearer token required)
//! GET  /activity               - 365-day solved-count heatmap data
//! ```

pub mod activity;
pub mod auth;
pub mod sheets;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/verify", post(auth::verify))
        .route("/login", post(auth::login))
}

/// Create the sheet routes router.
pub fn sheet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(sheets::list).post(sheets::create))
        .route(
            "/{id}",
            get(sheets::detail)
                .put(sheets::update)
                .delete(sheets::remove),
        )
        .route("/{id}/toggle", post(sheets::toggle))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/sheets", sheet_routes())
        .route("/activity", get(activity::activity))
}
