//! Problem catalog subdocuments.
//!
//! A sheet owns an ordered list of [`Problem`]s stored as a single JSONB
//! document. Problems are identified by a stable [`ProblemId`] UUID so that
//! per-user progress survives catalog reorders; the positional index exposed
//! by the API is recomputed on every read.

use serde::{Deserialize, Serialize};

use crate::types::{Difficulty, ProblemId};

/// One problem in a sheet's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Stable identifier, assigned when the problem is first written.
    pub id: ProblemId,
    /// Display title, e.g. "Two Sum".
    pub title: String,
    /// Link to the problem statement.
    pub link: String,
    /// Difficulty rating.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Topic tag, e.g. "Array" or "Linked List".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl Problem {
    /// Create a problem with a freshly generated ID.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        difficulty: Difficulty,
        topic: Option<String>,
    ) -> Self {
        Self {
            id: ProblemId::generate(),
            title: title.into(),
            link: link.into(),
            difficulty,
            topic,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assigns_id() {
        let a = Problem::new("Two Sum", "https://example.com/two-sum", Difficulty::Easy, None);
        let b = Problem::new("Two Sum", "https://example.com/two-sum", Difficulty::Easy, None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_difficulty_defaults_on_deserialize() {
        let json = format!(
            r#"{{"id":"{}","title":"LRU Cache","link":"https://example.com/lru"}}"#,
            ProblemId::generate()
        );
        let problem: Problem = serde_json::from_str(&json).unwrap();
        assert_eq!(problem.difficulty, Difficulty::Easy);
        assert_eq!(problem.topic, None);
    }

    #[test]
    fn test_serde_roundtrip() {
        let problem = Problem::new(
            "Merge Intervals",
            "https://example.com/merge-intervals",
            Difficulty::Medium,
            Some("Intervals".to_owned()),
        );
        let json = serde_json::to_string(&problem).unwrap();
        let parsed: Problem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, problem);
    }
}
