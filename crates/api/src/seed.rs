//! Idempotent seeding of the curated default sheets.
//!
//! Runs on every boot; a default sheet is inserted only when no sheet with
//! the same (title, kind=default) pair exists, so restarts never duplicate
//! the catalog or reissue problem IDs.

use sqlx::PgPool;

use grindtrack_core::{Difficulty, Problem, SheetKind};

use crate::db::RepositoryError;
use crate::db::sheets::SheetRepository;

struct DefaultSheet {
    title: &'static str,
    description: &'static str,
    problems: &'static [(&'static str, &'static str, Difficulty, &'static str)],
}

const DEFAULT_SHEETS: &[DefaultSheet] = &[
    DefaultSheet {
        title: "Blind 75",
        description: "Curated list of 75 essential LeetCode problems",
        problems: &[
            (
                "Two Sum",
                "https://leetcode.com/problems/two-sum/",
                Difficulty::Easy,
                "Array",
            ),
            (
                "Best Time to Buy and Sell Stock",
                "https://leetcode.com/problems/best-time-to-buy-and-sell-stock/",
                Difficulty::Easy,
                "Array",
            ),
            (
                "Valid Parentheses",
                "https://leetcode.com/problems/valid-parentheses/",
                Difficulty::Easy,
                "Stack",
            ),
        ],
    },
    DefaultSheet {
        title: "Striver SDE Sheet",
        description: "Striver's SDE Sheet for interview preparation",
        problems: &[
            (
                "Set Matrix Zeroes",
                "https://leetcode.com/problems/set-matrix-zeroes/",
                Difficulty::Medium,
                "Array",
            ),
            (
                "Merge Intervals",
                "https://leetcode.com/problems/merge-intervals/",
                Difficulty::Medium,
                "Intervals",
            ),
        ],
    },
    DefaultSheet {
        title: "Java Revision",
        description: "Important Java DSA problems for quick revision",
        problems: &[
            (
                "Reverse Linked List",
                "https://leetcode.com/problems/reverse-linked-list/",
                Difficulty::Easy,
                "Linked List",
            ),
            (
                "LRU Cache",
                "https://leetcode.com/problems/lru-cache/",
                Difficulty::Medium,
                "Design",
            ),
        ],
    },
];

/// Insert any missing default sheet.
///
/// # Errors
///
/// Returns `RepositoryError` if a lookup or insert fails.
pub async fn seed_default_sheets(pool: &PgPool) -> Result<(), RepositoryError> {
    let sheets = SheetRepository::new(pool);

    for default in DEFAULT_SHEETS {
        if sheets.exists(default.title, SheetKind::Default).await? {
            continue;
        }

        let problems: Vec<Problem> = default
            .problems
            .iter()
            .map(|(title, link, difficulty, topic)| {
                Problem::new(*title, *link, *difficulty, Some((*topic).to_owned()))
            })
            .collect();

        sheets
            .create(
                default.title,
                default.description,
                SheetKind::Default,
                &problems,
            )
            .await?;

        tracing::info!(title = default.title, "Seeded default sheet");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sheets_are_well_formed() {
        assert_eq!(DEFAULT_SHEETS.len(), 3);
        for sheet in DEFAULT_SHEETS {
            assert!(!sheet.title.is_empty());
            assert!(!sheet.problems.is_empty());
            for (title, link, _, topic) in sheet.problems {
                assert!(!title.is_empty());
                assert!(link.starts_with("https://"));
                assert!(!topic.is_empty());
            }
        }
    }

    #[test]
    fn test_default_sheet_titles_are_unique() {
        let mut titles: Vec<_> = DEFAULT_SHEETS.iter().map(|s| s.title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), DEFAULT_SHEETS.len());
    }
}
