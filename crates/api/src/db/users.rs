//! User repository for database operations.
//!
//! The progress overlay rides on the user row as JSONB; each mutation
//! writes the whole overlay back, so a toggle is one read and one write.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use grindtrack_core::{Email, OtpCode, ProgressSet, UserId};

use super::RepositoryError;
use crate::models::User;

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    password_hash: String,
    is_verified: bool,
    otp_code: Option<String>,
    otp_expires: Option<DateTime<Utc>>,
    progress: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let otp_code = row
            .otp_code
            .as_deref()
            .map(OtpCode::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid OTP code in database: {e}"))
            })?;

        let progress: ProgressSet = serde_json::from_value(row.progress).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid progress overlay in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            password_hash: row.password_hash,
            is_verified: row.is_verified,
            otp_code,
            otp_expires: row.otp_expires,
            progress,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, email, password_hash, is_verified, otp_code, otp_expires, progress, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM app_user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM app_user WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new unverified user with a pending one-time code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        otp: &OtpCode,
        otp_expires: DateTime<Utc>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            INSERT INTO app_user (email, password_hash, otp_code, otp_expires)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(email.as_str())
        .bind(password_hash)
        .bind(otp.as_str())
        .bind(otp_expires)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Mark a user verified and clear the pending code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_verified(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE app_user
            SET is_verified = TRUE, otp_code = NULL, otp_expires = NULL, updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Write a user's full progress overlay back to their row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn save_progress(
        &self,
        id: UserId,
        progress: &ProgressSet,
    ) -> Result<(), RepositoryError> {
        let progress_json = serde_json::to_value(progress).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize overlay: {e}"))
        })?;

        let result = sqlx::query(
            r"
            UPDATE app_user
            SET progress = $2, updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .bind(progress_json)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
