//! HTTP middleware and extractors.
//!
//! # Layer Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, trace transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS (configured origin allow-list)
//!
//! Authentication is an extractor rather than a layer: handlers that need
//! the caller declare a [`CurrentUser`] parameter.

pub mod auth;

pub use auth::CurrentUser;
