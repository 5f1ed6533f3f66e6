use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::db::models::day::DayKey;

/// Unique, ordered set of solved identifiers.
///
/// Persisted as a JSON array in a single hash field; this type only exists on the Rust side
/// of that boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolvedSet<T: Ord>(BTreeSet<T>);

impl<T: Ord> Default for SolvedSet<T> {
    fn default() -> Self {
        Self(BTreeSet::new())
    }
}

impl<T: Ord> SolvedSet<T> {
    /// Returns `false` when `item` was already present.
    pub fn insert(&mut self, item: T) -> bool {
        self.0.insert(item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.0.contains(item)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T: Ord> FromIterator<T> for SolvedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything tracked for a single user, read in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub username: String,
    pub daily_solved_list: SolvedSet<DayKey>,
    pub daily_solved_count_by_day: BTreeMap<String, i64>,
    pub total_daily_solved: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_daily_solved_date: Option<DayKey>,
    pub user_generated_solved: i64,
    pub created_puzzles: i64,
    pub flair_rank: i64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_solved_set_is_idempotent() {
        let mut set = SolvedSet::default();
        let day = DayKey::parse("6-1-2025").unwrap();

        assert!(set.insert(day));
        assert!(!set.insert(day));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&day));
    }

    #[test]
    fn test_solved_set_serializes_as_array() {
        let set: SolvedSet<String> = ["b", "a", "b"].into_iter().map(String::from).collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }
}
