//! Sheet repository for database operations.
//!
//! The problem catalog is stored as a JSONB array on the sheet row, so a
//! sheet reads and writes as one document.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use grindtrack_core::{Problem, SheetId, SheetKind};

use super::RepositoryError;
use crate::models::Sheet;

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct SheetRow {
    id: i32,
    title: String,
    description: String,
    kind: String,
    problems: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SheetRow> for Sheet {
    type Error = RepositoryError;

    fn try_from(row: SheetRow) -> Result<Self, Self::Error> {
        let kind: SheetKind = row.kind.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid sheet kind in database: {e}"))
        })?;

        let problems: Vec<Problem> = serde_json::from_value(row.problems).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid problem catalog in database: {e}"))
        })?;

        Ok(Self {
            id: SheetId::new(row.id),
            title: row.title,
            description: row.description,
            kind,
            problems,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Fields accepted by [`SheetRepository::update`]; `None` leaves the column
/// untouched.
#[derive(Debug, Default)]
pub struct SheetPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub problems: Option<Vec<Problem>>,
}

/// Repository for sheet database operations.
pub struct SheetRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SheetRepository<'a> {
    /// Create a new sheet repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every sheet in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored catalog is invalid.
    pub async fn list_all(&self) -> Result<Vec<Sheet>, RepositoryError> {
        let rows = sqlx::query_as::<_, SheetRow>(
            r"
            SELECT id, title, description, kind, problems, created_at, updated_at
            FROM sheet
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a sheet by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored catalog is invalid.
    pub async fn get(&self, id: SheetId) -> Result<Option<Sheet>, RepositoryError> {
        let row = sqlx::query_as::<_, SheetRow>(
            r"
            SELECT id, title, description, kind, problems, created_at, updated_at
            FROM sheet
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Whether a sheet with this title and kind already exists.
    ///
    /// Used by the idempotent default-sheet seeding.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, title: &str, kind: SheetKind) -> Result<bool, RepositoryError> {
        let found: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM sheet WHERE title = $1 AND kind = $2")
                .bind(title)
                .bind(kind.to_string())
                .fetch_optional(self.pool)
                .await?;

        Ok(found.is_some())
    }

    /// Create a new sheet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the title is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        title: &str,
        description: &str,
        kind: SheetKind,
        problems: &[Problem],
    ) -> Result<Sheet, RepositoryError> {
        let problems_json = serde_json::to_value(problems).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize catalog: {e}"))
        })?;

        let row = sqlx::query_as::<_, SheetRow>(
            r"
            INSERT INTO sheet (title, description, kind, problems)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, kind, problems, created_at, updated_at
            ",
        )
        .bind(title)
        .bind(description)
        .bind(kind.to_string())
        .bind(problems_json)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("sheet title already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Partially update a sheet by ID, returning the updated row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the sheet doesn't exist.
    /// Returns `RepositoryError::Conflict` if a new title collides.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: SheetId, patch: SheetPatch) -> Result<Sheet, RepositoryError> {
        let problems_json = patch
            .problems
            .as_deref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("failed to serialize catalog: {e}"))
            })?;

        let row = sqlx::query_as::<_, SheetRow>(
            r"
            UPDATE sheet
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                problems = COALESCE($4, problems),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, kind, problems, created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(patch.title)
        .bind(patch.description)
        .bind(problems_json)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("sheet title already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.map_or(Err(RepositoryError::NotFound), TryInto::try_into)
    }

    /// Delete a sheet by ID.
    ///
    /// # Returns
    ///
    /// Returns `true` if the sheet was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: SheetId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM sheet WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
