//! Integration tests for Grindtrack.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p grindtrack-cli -- migrate
//!
//! # Start the API
//! cargo run -p grindtrack-api
//!
//! # Run integration tests (they are #[ignore]d by default)
//! cargo test -p grindtrack-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `GRINDTRACK_BASE_URL` - API base URL (default: `http://localhost:5000`)
//! - `GRINDTRACK_TEST_TOKEN` - Bearer token of a verified test account,
//!   required by the authenticated tests. Obtain one by completing the
//!   signup/verify flow against a test mailbox and exporting the token.

use reqwest::Client;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("GRINDTRACK_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Bearer token of a verified test account, if configured.
#[must_use]
pub fn test_token() -> Option<String> {
    std::env::var("GRINDTRACK_TEST_TOKEN").ok()
}

/// Create a plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique sheet title so concurrent test runs never collide.
#[must_use]
pub fn unique_title(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}
