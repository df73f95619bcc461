//! CLI command implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Load the database URL from the environment.
///
/// Checks `GRINDTRACK_DATABASE_URL` first, then the generic `DATABASE_URL`.
pub(crate) fn database_url() -> Result<SecretString, MissingEnvVar> {
    dotenvy::dotenv().ok();

    std::env::var("GRINDTRACK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MissingEnvVar("GRINDTRACK_DATABASE_URL"))
}

/// A required environment variable was not set.
#[derive(Debug, thiserror::Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVar(&'static str);
