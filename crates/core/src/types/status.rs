//! Status enums for sheets and problems.

use serde::{Deserialize, Serialize};

/// Problem difficulty rating.
///
/// Serialized capitalized ("Easy") to match the wire format consumed by
/// the front-end's filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Whether a sheet is part of the curated catalog or user-created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SheetKind {
    /// Curated sheet seeded at boot, shared by all users.
    Default,
    /// Sheet created by a user.
    #[default]
    Custom,
}

/// Per-user solve state for a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProblemStatus {
    Solved,
    #[default]
    Unsolved,
}

impl ProblemStatus {
    /// Returns true for [`ProblemStatus::Solved`].
    #[must_use]
    pub const fn is_solved(self) -> bool {
        matches!(self, Self::Solved)
    }

    /// Map a boolean toggle value onto a status.
    #[must_use]
    pub const fn from_solved(solved: bool) -> Self {
        if solved { Self::Solved } else { Self::Unsolved }
    }
}

impl std::fmt::Display for SheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for SheetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("invalid sheet kind: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_wire_format() {
        assert_eq!(serde_json::to_string(&Difficulty::Easy).unwrap(), "\"Easy\"");
        assert_eq!(
            serde_json::from_str::<Difficulty>("\"Medium\"").unwrap(),
            Difficulty::Medium
        );
    }

    #[test]
    fn test_difficulty_defaults_easy() {
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }

    #[test]
    fn test_sheet_kind_roundtrip() {
        assert_eq!(SheetKind::Default.to_string(), "default");
        assert_eq!("custom".parse::<SheetKind>().unwrap(), SheetKind::Custom);
        assert!("weekly".parse::<SheetKind>().is_err());
    }

    #[test]
    fn test_status_lowercase_wire_format() {
        assert_eq!(
            serde_json::to_string(&ProblemStatus::Solved).unwrap(),
            "\"solved\""
        );
    }

    #[test]
    fn test_status_from_solved() {
        assert!(ProblemStatus::from_solved(true).is_solved());
        assert!(!ProblemStatus::from_solved(false).is_solved());
    }
}
