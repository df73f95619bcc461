//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::email::EmailService;
use crate::services::token::TokenService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool, mailer, and token service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    mailer: EmailService,
    tokens: TokenService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be configured.
    pub fn new(
        config: AppConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let mailer = EmailService::new(&config.email)?;
        let tokens = TokenService::new(&config.token_secret);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mailer,
                tokens,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the email service.
    #[must_use]
    pub fn mailer(&self) -> &EmailService {
        &self.inner.mailer
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }
}
