//! Sheet domain types.

use chrono::{DateTime, Utc};

use grindtrack_core::{Problem, SheetId, SheetKind};

/// A named catalog of problems (domain type).
///
/// Default sheets are seeded at boot and shared by all users; custom sheets
/// are created through the API. The per-user solved/starred/notes state
/// lives on the user record, not here.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Unique sheet ID.
    pub id: SheetId,
    /// Unique display title.
    pub title: String,
    /// Short description shown in the listing.
    pub description: String,
    /// Curated or user-created.
    pub kind: SheetKind,
    /// Ordered problem catalog.
    pub problems: Vec<Problem>,
    /// When the sheet was created.
    pub created_at: DateTime<Utc>,
    /// When the sheet was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Sheet {
    /// The problem at a positional index, if in range.
    #[must_use]
    pub fn problem_at(&self, index: usize) -> Option<&Problem> {
        self.problems.get(index)
    }
}
