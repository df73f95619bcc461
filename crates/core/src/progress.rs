//! Per-user progress overlay and its aggregation logic.
//!
//! Every user carries a sparse [`ProgressSet`]: a map from
//! (sheet, problem) to [`ProgressEntry`]. Absence of an entry means the
//! default state (unsolved, unstarred, no notes). The map is stored as one
//! JSONB document on the user record and written back whole after each
//! mutation, so the composite [`ProgressKey`] serializes as a plain string.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{ProblemId, ProblemStatus, SheetId};

/// Composite key identifying one problem in one sheet.
///
/// Serialized as `"<sheetId>:<problemId>"` so a [`ProgressSet`] maps onto a
/// JSON object. Keying on the problem's stable UUID (not its position)
/// keeps overlays intact across catalog reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgressKey {
    /// The sheet the problem belongs to.
    pub sheet: SheetId,
    /// The problem within that sheet.
    pub problem: ProblemId,
}

impl ProgressKey {
    /// Create a key for a (sheet, problem) pair.
    #[must_use]
    pub const fn new(sheet: SheetId, problem: ProblemId) -> Self {
        Self { sheet, problem }
    }
}

impl std::fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.sheet, self.problem)
    }
}

/// Error parsing a [`ProgressKey`] from its string form.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ProgressKeyError {
    /// The string does not contain a `:` separator.
    #[error("progress key must be '<sheetId>:<problemId>'")]
    MissingSeparator,
    /// The sheet id is not a valid integer.
    #[error("invalid sheet id in progress key: {0}")]
    InvalidSheet(#[from] std::num::ParseIntError),
    /// The problem id is not a valid UUID.
    #[error("invalid problem id in progress key: {0}")]
    InvalidProblem(#[from] uuid::Error),
}

impl std::str::FromStr for ProgressKey {
    type Err = ProgressKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sheet, problem) = s
            .split_once(':')
            .ok_or(ProgressKeyError::MissingSeparator)?;
        Ok(Self {
            sheet: sheet.parse()?,
            problem: problem.parse()?,
        })
    }
}

impl Serialize for ProgressKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProgressKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = ProgressKey;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a '<sheetId>:<problemId>' string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}

/// One user's state for one problem in one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    /// Solve state.
    #[serde(default)]
    pub status: ProblemStatus,
    /// Whether the user starred this problem.
    #[serde(default)]
    pub is_starred: bool,
    /// Free-form notes, overwritten verbatim on update.
    #[serde(default)]
    pub notes: String,
    /// When the problem was last marked solved. Cleared on un-solve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_solved: Option<DateTime<Utc>>,
}

/// Partial update applied by the toggle endpoint.
///
/// Only fields present in the request are applied; the rest of the entry is
/// left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToggleUpdate {
    /// Set the solve state, stamping or clearing `date_solved`.
    pub solved: Option<bool>,
    /// Overwrite the starred flag.
    pub star: Option<bool>,
    /// Overwrite the notes verbatim (no append or merge).
    pub note: Option<String>,
}

impl ToggleUpdate {
    /// Returns true when no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.solved.is_none() && self.star.is_none() && self.note.is_none()
    }
}

/// Solved-count activity over the trailing 365 days, bucketed by UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// First day of the window (inclusive).
    pub start: NaiveDate,
    /// Last day of the window (inclusive).
    pub end: NaiveDate,
    /// Sparse day -> solved-count mapping; days without solves are absent.
    pub counts: BTreeMap<NaiveDate, u32>,
}

/// A user's sparse progress overlay, keyed by (sheet, problem).
///
/// The map keying structurally enforces the invariant of at most one entry
/// per (user, sheet, problem) triple and gives O(log n) lookup during the
/// catalog merge instead of an array scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ProgressSet(BTreeMap<ProgressKey, ProgressEntry>);

impl ProgressSet {
    /// Create an empty overlay.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Number of entries in the overlay.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the overlay has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the entry for a (sheet, problem) pair, if any.
    #[must_use]
    pub fn get(&self, key: &ProgressKey) -> Option<&ProgressEntry> {
        self.0.get(key)
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&ProgressKey, &ProgressEntry)> {
        self.0.iter()
    }

    /// Find-or-create the entry for `key` and apply `update` to it.
    ///
    /// Setting `solved` flips the status and stamps `date_solved` with `now`
    /// (or clears it on un-solve). `star` and `note` overwrite their fields.
    /// Entries are created lazily on first toggle and never removed here,
    /// even when the update returns them to the default state.
    pub fn apply(&mut self, key: ProgressKey, update: &ToggleUpdate, now: DateTime<Utc>) {
        let entry = self.0.entry(key).or_default();

        if let Some(solved) = update.solved {
            entry.status = ProblemStatus::from_solved(solved);
            entry.date_solved = solved.then_some(now);
        }
        if let Some(star) = update.star {
            entry.is_starred = star;
        }
        if let Some(note) = &update.note {
            entry.notes.clone_from(note);
        }
    }

    /// Count this user's solved problems in one sheet.
    #[must_use]
    pub fn solved_count(&self, sheet: SheetId) -> usize {
        self.0
            .iter()
            .filter(|(key, entry)| key.sheet == sheet && entry.status.is_solved())
            .count()
    }

    /// Solved counts for every sheet with at least one solved entry.
    ///
    /// One pass over the overlay; used by the sheet listing so it does not
    /// rescan per sheet.
    #[must_use]
    pub fn solved_counts(&self) -> BTreeMap<SheetId, usize> {
        let mut counts = BTreeMap::new();
        for (key, entry) in &self.0 {
            if entry.status.is_solved() {
                *counts.entry(key.sheet).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Remove every entry belonging to `sheet`, returning how many were
    /// dropped. Called when a sheet is deleted so overlays do not orphan.
    pub fn remove_sheet(&mut self, sheet: SheetId) -> usize {
        let before = self.0.len();
        self.0.retain(|key, _| key.sheet != sheet);
        before - self.0.len()
    }

    /// Bucket solved entries from the trailing 365 days by UTC calendar day.
    #[must_use]
    pub fn activity(&self, now: DateTime<Utc>) -> ActivitySummary {
        let end = now.date_naive();
        let start = now
            .checked_sub_days(Days::new(364))
            .map_or(end, |d| d.date_naive());

        let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for entry in self.0.values() {
            if !entry.status.is_solved() {
                continue;
            }
            let Some(solved_at) = entry.date_solved else {
                continue;
            };
            let day = solved_at.date_naive();
            if day >= start && day <= end {
                *counts.entry(day).or_insert(0) += 1;
            }
        }

        ActivitySummary { start, end, counts }
    }
}

/// Percentage of `total` problems solved, rounded half-up.
///
/// Returns 0 for an empty sheet rather than dividing by zero.
#[must_use]
pub const fn progress_percent(solved: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (200 * solved + total) / (2 * total);
    // solved <= total, so pct <= 100
    pct as u8
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn key(sheet: i32) -> ProgressKey {
        ProgressKey::new(SheetId::new(sheet), ProblemId::generate())
    }

    fn solve(set: &mut ProgressSet, key: ProgressKey, now: DateTime<Utc>) {
        set.apply(
            key,
            &ToggleUpdate {
                solved: Some(true),
                ..Default::default()
            },
            now,
        );
    }

    #[test]
    fn test_key_roundtrip() {
        let k = key(12);
        let parsed: ProgressKey = k.to_string().parse().unwrap();
        assert_eq!(parsed, k);
    }

    #[test]
    fn test_key_parse_errors() {
        assert!(matches!(
            "no-separator".parse::<ProgressKey>(),
            Err(ProgressKeyError::MissingSeparator)
        ));
        assert!(matches!(
            "x:00000000-0000-0000-0000-000000000000".parse::<ProgressKey>(),
            Err(ProgressKeyError::InvalidSheet(_))
        ));
        assert!(matches!(
            "3:not-a-uuid".parse::<ProgressKey>(),
            Err(ProgressKeyError::InvalidProblem(_))
        ));
    }

    #[test]
    fn test_set_serializes_as_json_object() {
        let mut set = ProgressSet::new();
        let k = key(3);
        solve(&mut set, k, Utc::now());

        let json = serde_json::to_value(&set).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key(&k.to_string()));

        let parsed: ProgressSet = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, set);
    }

    #[test]
    fn test_apply_creates_entry_lazily() {
        let mut set = ProgressSet::new();
        let k = key(1);
        assert!(set.get(&k).is_none());

        set.apply(
            k,
            &ToggleUpdate {
                star: Some(true),
                ..Default::default()
            },
            Utc::now(),
        );

        let entry = set.get(&k).unwrap();
        assert!(entry.is_starred);
        assert_eq!(entry.status, ProblemStatus::Unsolved);
        assert_eq!(entry.date_solved, None);
    }

    #[test]
    fn test_solve_then_unsolve_clears_date() {
        let mut set = ProgressSet::new();
        let k = key(1);
        let now = Utc::now();

        solve(&mut set, k, now);
        assert_eq!(set.get(&k).unwrap().date_solved, Some(now));

        set.apply(
            k,
            &ToggleUpdate {
                solved: Some(false),
                ..Default::default()
            },
            now,
        );
        let entry = set.get(&k).unwrap();
        assert_eq!(entry.status, ProblemStatus::Unsolved);
        assert_eq!(entry.date_solved, None);
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut set = ProgressSet::new();
        let k = key(1);
        let now = Utc::now();

        solve(&mut set, k, now);
        set.apply(
            k,
            &ToggleUpdate {
                note: Some("two pointers".to_owned()),
                ..Default::default()
            },
            now,
        );

        let entry = set.get(&k).unwrap();
        assert!(entry.status.is_solved());
        assert_eq!(entry.date_solved, Some(now));
        assert_eq!(entry.notes, "two pointers");
    }

    #[test]
    fn test_note_overwrites_verbatim() {
        let mut set = ProgressSet::new();
        let k = key(1);
        let now = Utc::now();

        set.apply(
            k,
            &ToggleUpdate {
                note: Some("first".to_owned()),
                ..Default::default()
            },
            now,
        );
        set.apply(
            k,
            &ToggleUpdate {
                note: Some("second".to_owned()),
                ..Default::default()
            },
            now,
        );
        assert_eq!(set.get(&k).unwrap().notes, "second");
    }

    #[test]
    fn test_solved_counts_per_sheet() {
        let mut set = ProgressSet::new();
        let now = Utc::now();
        solve(&mut set, key(1), now);
        solve(&mut set, key(1), now);
        solve(&mut set, key(2), now);
        // starred but unsolved entry must not count
        set.apply(
            key(1),
            &ToggleUpdate {
                star: Some(true),
                ..Default::default()
            },
            now,
        );

        assert_eq!(set.solved_count(SheetId::new(1)), 2);
        assert_eq!(set.solved_count(SheetId::new(2)), 1);
        assert_eq!(set.solved_count(SheetId::new(3)), 0);

        let counts = set.solved_counts();
        assert_eq!(counts.get(&SheetId::new(1)), Some(&2));
        assert_eq!(counts.get(&SheetId::new(2)), Some(&1));
        assert_eq!(counts.get(&SheetId::new(3)), None);
    }

    #[test]
    fn test_remove_sheet_prunes_only_that_sheet() {
        let mut set = ProgressSet::new();
        let now = Utc::now();
        solve(&mut set, key(1), now);
        solve(&mut set, key(1), now);
        solve(&mut set, key(2), now);

        assert_eq!(set.remove_sheet(SheetId::new(1)), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.solved_count(SheetId::new(2)), 1);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(0, 10), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(1, 2), 50);
        assert_eq!(progress_percent(1, 8), 13);
        assert_eq!(progress_percent(75, 75), 100);
    }

    #[test]
    fn test_activity_buckets_same_day() {
        let mut set = ProgressSet::new();
        let solved_at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        let later_same_day = Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap();
        solve(&mut set, key(1), solved_at);
        solve(&mut set, key(1), later_same_day);

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let summary = set.activity(now);

        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(summary.counts.get(&day), Some(&2));
        assert_eq!(summary.end, now.date_naive());
    }

    #[test]
    fn test_activity_window_excludes_old_entries() {
        let mut set = ProgressSet::new();
        let old = Utc.with_ymd_and_hms(2022, 1, 1, 12, 0, 0).unwrap();
        solve(&mut set, key(1), old);

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let summary = set.activity(now);
        assert!(summary.counts.is_empty());
    }

    #[test]
    fn test_activity_ignores_unsolved() {
        let mut set = ProgressSet::new();
        let now = Utc::now();
        let k = key(1);
        solve(&mut set, k, now);
        set.apply(
            k,
            &ToggleUpdate {
                solved: Some(false),
                ..Default::default()
            },
            now,
        );

        assert!(set.activity(now).counts.is_empty());
    }

    #[test]
    fn test_activity_window_is_365_days() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 12, 0, 0).unwrap();
        let summary = ProgressSet::new().activity(now);
        assert_eq!(
            summary.end - summary.start,
            chrono::Duration::days(364)
        );
    }

    #[test]
    fn test_activity_serializes_iso_dates() {
        let mut set = ProgressSet::new();
        let solved_at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        solve(&mut set, key(1), solved_at);

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let json = serde_json::to_value(set.activity(now)).unwrap();
        assert_eq!(json["counts"]["2024-01-01"], 1);
        assert_eq!(json["end"], "2024-03-01");
    }
}
