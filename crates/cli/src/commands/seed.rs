//! Seed the curated default sheets.
//!
//! The API binary also seeds on boot; this command exists so a fresh
//! database can be populated without starting the server.
//!
//! # Usage
//!
//! ```bash
//! grindtrack-cli seed
//! ```

use thiserror::Error;

use grindtrack_api::db;
use grindtrack_api::seed::seed_default_sheets;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    MissingEnvVar(#[from] super::MissingEnvVar),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] db::RepositoryError),
}

/// Seed any missing default sheet.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    seed_default_sheets(&pool).await?;

    tracing::info!("Seeding complete!");
    Ok(())
}
