use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::instrument;

use crate::constants::{FIELD_DATE, FIELD_FLAIR_RANK, FIELD_LIST, FIELD_LONGEST, FIELD_STREAK};
use crate::db::StoreResult;
use crate::db::keys::UserKey;
use crate::db::models::day::DayKey;
use crate::db::models::progress::{SolvedSet, UserStats};
use crate::db::repositories::{Repository, parse_int};
use crate::db::store::KeyValueStore;

/// Per-user progress counters. These are the source of truth the leaderboards are derived from.
///
/// Callers are expected to have validated `username`; every read on an unknown user returns a
/// zero or empty default.
#[derive(Clone)]
pub struct ProgressRepository {
    store: Arc<dyn KeyValueStore>,
}

impl Repository for ProgressRepository {
    fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}

impl ProgressRepository {
    /// Idempotent insert into the solved-day list. Returns `true` if `day` was not yet present.
    #[instrument(skip(self))]
    pub async fn add_solved_day(&self, username: &str, day: &DayKey) -> StoreResult<bool> {
        let key = UserKey::DailySolvedList.with_name(username);
        let (_, inserted) = self
            .insert_into_list(&key, FIELD_LIST, &day.to_string())
            .await?;

        tracing::debug!(username, %day, inserted, "recorded solved day");
        Ok(inserted)
    }

    /// Solved days that parse as valid identifiers; anything else in the stored list is skipped.
    #[instrument(skip(self))]
    pub async fn get_solved_days(&self, username: &str) -> StoreResult<SolvedSet<DayKey>> {
        let key = UserKey::DailySolvedList.with_name(username);
        let raw = self.read_list(&key, FIELD_LIST).await?;

        Ok(raw
            .iter()
            .filter_map(|entry| match DayKey::parse(entry) {
                Ok(day) => Some(day),
                Err(e) => {
                    tracing::warn!(username, entry, error = %e, "skipping unreadable solved day");
                    None
                }
            })
            .collect())
    }

    pub async fn has_solved_day(&self, username: &str, day: &DayKey) -> StoreResult<bool> {
        let key = UserKey::DailySolvedList.with_name(username);
        let target = day.to_string();

        Ok(self
            .read_list(&key, FIELD_LIST)
            .await?
            .iter()
            .any(|entry| *entry == target))
    }

    #[instrument(skip(self))]
    pub async fn increment_daily_count(&self, username: &str, day: &DayKey) -> StoreResult<i64> {
        let key = UserKey::DailySolvedCount.with_name(username);
        self.store.hincr(&key, &day.to_string(), 1).await
    }

    pub async fn get_daily_counts(&self, username: &str) -> StoreResult<BTreeMap<String, i64>> {
        let key = UserKey::DailySolvedCount.with_name(username);
        self.store
            .hgetall(&key)
            .await?
            .into_iter()
            .map(|(day, raw)| parse_int(&key, &raw).map(|count| (day, count)))
            .collect()
    }

    /// Sum over every per-day bucket.
    #[instrument(skip(self))]
    pub async fn get_total_solved_count(&self, username: &str) -> StoreResult<i64> {
        Ok(self.get_daily_counts(username).await?.values().sum())
    }

    pub async fn get_streak(&self, username: &str) -> StoreResult<i64> {
        self.read_int(&UserKey::Streak.with_name(username), FIELD_STREAK)
            .await
    }

    pub async fn set_streak(&self, username: &str, streak: i64) -> StoreResult<()> {
        self.write_int(&UserKey::Streak.with_name(username), FIELD_STREAK, streak)
            .await
    }

    pub async fn get_longest_streak(&self, username: &str) -> StoreResult<i64> {
        self.read_int(&UserKey::LongestStreak.with_name(username), FIELD_LONGEST)
            .await
    }

    pub async fn set_longest_streak(&self, username: &str, longest: i64) -> StoreResult<()> {
        self.write_int(
            &UserKey::LongestStreak.with_name(username),
            FIELD_LONGEST,
            longest,
        )
        .await
    }

    /// `None` both when nothing was stored and when the stored value is not a valid day.
    #[instrument(skip(self))]
    pub async fn get_last_solved_date(&self, username: &str) -> StoreResult<Option<DayKey>> {
        let key = UserKey::LastDailySolved.with_name(username);
        let Some(raw) = self.store.hget(&key, FIELD_DATE).await? else {
            return Ok(None);
        };

        if raw.is_empty() {
            return Ok(None);
        }

        match DayKey::parse(&raw) {
            Ok(day) => Ok(Some(day)),
            Err(e) => {
                tracing::warn!(username, raw, error = %e, "ignoring unreadable last-solved date");
                Ok(None)
            }
        }
    }

    pub async fn set_last_solved_date(&self, username: &str, day: &DayKey) -> StoreResult<()> {
        let key = UserKey::LastDailySolved.with_name(username);
        self.store.hset(&key, FIELD_DATE, &day.to_string()).await
    }

    /// Idempotent insert into the user-generated solved list; returns the resulting list length.
    #[instrument(skip(self))]
    pub async fn add_user_generated_solved(
        &self,
        username: &str,
        puzzle_id: &str,
    ) -> StoreResult<usize> {
        let key = UserKey::UserGeneratedSolved.with_name(username);
        let (len, inserted) = self.insert_into_list(&key, FIELD_LIST, puzzle_id).await?;

        tracing::debug!(username, puzzle_id, inserted, "recorded user-generated solve");
        Ok(len)
    }

    pub async fn get_user_generated_solved(
        &self,
        username: &str,
    ) -> StoreResult<SolvedSet<String>> {
        let key = UserKey::UserGeneratedSolved.with_name(username);
        Ok(self.read_list(&key, FIELD_LIST).await?.into_iter().collect())
    }

    pub async fn get_user_generated_solved_count(&self, username: &str) -> StoreResult<i64> {
        Ok(self.get_user_generated_solved(username).await?.len() as i64)
    }

    /// Idempotent insert into the list of puzzles `username` created; returns the list length.
    #[instrument(skip(self))]
    pub async fn add_created_puzzle(&self, username: &str, puzzle_id: &str) -> StoreResult<usize> {
        let key = UserKey::CreatedPuzzles.with_name(username);
        let (len, inserted) = self.insert_into_list(&key, FIELD_LIST, puzzle_id).await?;

        tracing::debug!(username, puzzle_id, inserted, "recorded created puzzle");
        Ok(len)
    }

    pub async fn get_created_count(&self, username: &str) -> StoreResult<i64> {
        let key = UserKey::CreatedPuzzles.with_name(username);
        let created: SolvedSet<String> =
            self.read_list(&key, FIELD_LIST).await?.into_iter().collect();
        Ok(created.len() as i64)
    }

    pub async fn get_flair_rank(&self, username: &str) -> StoreResult<i64> {
        self.read_int(&UserKey::Flair.with_name(username), FIELD_FLAIR_RANK)
            .await
    }

    pub async fn set_flair_rank(&self, username: &str, rank: i64) -> StoreResult<()> {
        self.write_int(&UserKey::Flair.with_name(username), FIELD_FLAIR_RANK, rank)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_stats(&self, username: &str) -> StoreResult<UserStats> {
        let (solved, counts, streak, longest, last) = futures::try_join!(
            self.get_solved_days(username),
            self.get_daily_counts(username),
            self.get_streak(username),
            self.get_longest_streak(username),
            self.get_last_solved_date(username),
        )?;

        let (user_generated, created, flair_rank) = futures::try_join!(
            self.get_user_generated_solved_count(username),
            self.get_created_count(username),
            self.get_flair_rank(username),
        )?;

        Ok(UserStats {
            username: username.to_string(),
            total_daily_solved: counts.values().sum(),
            daily_solved_list: solved,
            daily_solved_count_by_day: counts,
            current_streak: streak,
            longest_streak: longest,
            last_daily_solved_date: last,
            user_generated_solved: user_generated,
            created_puzzles: created,
            flair_rank,
        })
    }
}
