//! Authentication service.
//!
//! Handles the signup → verify → login flow: accounts are created
//! unverified with a pending one-time code, the code arrives by email, and
//! only verified accounts can log in and receive bearer tokens.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sqlx::PgPool;

use grindtrack_core::{Email, OtpCode};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::OtpCheck;
use crate::services::email::{EmailService, generate_otp_code};
use crate::services::token::TokenService;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Outcome of a verification attempt.
#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    /// Account was verified; a bearer token was issued.
    Verified(String),
    /// Account was already verified; no new token is issued.
    AlreadyVerified,
}

/// Authentication service.
///
/// Handles user registration, email verification, and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    mailer: &'a EmailService,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, mailer: &'a EmailService, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(pool),
            mailer,
            tokens,
        }
    }

    /// Register a new account and dispatch its verification code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    /// Returns `AuthError::Mailer` if the verification email cannot be sent.
    pub async fn signup(&self, email: &str, password: &str) -> Result<(), AuthError> {
        // Validate inputs
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let otp = generate_otp_code();
        let now = Utc::now();

        let user = self
            .users
            .create(&email, &password_hash, &otp, OtpCode::expiry_from(now))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        self.mailer
            .send_verification_code(user.email.as_str(), &otp)
            .await?;

        tracing::info!(user_id = %user.id, "Signup code dispatched");
        Ok(())
    }

    /// Check a one-time code and, on success, verify the account and issue
    /// a bearer token.
    ///
    /// A second verify on an already-verified account short-circuits
    /// without issuing a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email.
    /// Returns `AuthError::InvalidOtp` on mismatch, `AuthError::OtpExpired`
    /// when the window has passed.
    pub async fn verify(&self, email: &str, otp: &str) -> Result<VerifyOutcome, AuthError> {
        let email = Email::parse(email)?;
        let otp = OtpCode::parse(otp).map_err(|_| AuthError::InvalidOtp)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if user.is_verified {
            return Ok(VerifyOutcome::AlreadyVerified);
        }

        match user.otp_state(&otp, Utc::now()) {
            Some(OtpCheck::Valid) => {}
            Some(OtpCheck::Expired) => return Err(AuthError::OtpExpired),
            Some(OtpCheck::Mismatch) | None => return Err(AuthError::InvalidOtp),
        }

        self.users.mark_verified(user.id).await?;

        let token = self
            .tokens
            .issue(user.id, Utc::now())
            .map_err(|_| AuthError::TokenSigning)?;

        tracing::info!(user_id = %user.id, "Email verified");
        Ok(VerifyOutcome::Verified(token))
    }

    /// Login with email and password.
    ///
    /// Unknown email and wrong password surface the same error so callers
    /// cannot probe which addresses are registered.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on unknown email or wrong
    /// password, `AuthError::NotVerified` for an unverified account.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        if !user.is_verified {
            return Err(AuthError::NotVerified);
        }

        let token = self
            .tokens
            .issue(user.id, Utc::now())
            .map_err(|_| AuthError::TokenSigning)?;

        Ok(token)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_accepts_long_enough() {
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_rejected() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
