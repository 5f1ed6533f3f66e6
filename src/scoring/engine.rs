use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{Instrument, instrument};

use crate::constants::DEFAULT_LEADERBOARD_LIMIT;
use crate::db::models::day::DayKey;
use crate::db::models::leaderboard::{Board, LeaderboardEntry};
use crate::db::models::progress::UserStats;
use crate::db::repositories::Repository;
use crate::db::repositories::leaderboard::LeaderboardRepository;
use crate::db::repositories::progress::ProgressRepository;
use crate::db::store::KeyValueStore;
use crate::scoring::clock::Clock;
use crate::scoring::notify::{StreakEvent, StreakNotifier};
use crate::scoring::{ScoreErr, ScoreResult};

/// Which per-day bucket a first-time daily solve is counted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveBucket {
    /// The day the solve happened, even for a backlog puzzle. Matches data already written by
    /// the plugin.
    #[default]
    SolveDate,
    /// The day the puzzle was published for.
    PuzzleDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub bucket: SolveBucket,
    pub leaderboard_limit: usize,
    /// Passed along on streak events, e.g. the community the game runs in.
    pub context: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bucket: SolveBucket::default(),
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
            context: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub previous: i64,
    pub current: i64,
    pub longest: i64,
    /// `false` when the streak restarted at 1.
    pub continued: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The day was already in the solved list; only the leaderboard caches were refreshed.
    AlreadySolved,
    Recorded {
        total_solved: i64,
        /// Present only when today's puzzle was the one solved.
        streak: Option<StreakUpdate>,
    },
}

/// Records solves and keeps the leaderboards in step with the per-user counters.
///
/// Every step is a separate store write with no transaction around it. A failure part-way
/// through is repaired by the leaderboard resync that runs on the next re-solve or
/// leaderboard read. Streak events are delivered on spawned tasks, so the engine must be driven
/// from inside a tokio runtime.
pub struct ScoringEngine {
    progress: ProgressRepository,
    leaderboards: LeaderboardRepository,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn StreakNotifier>,
    config: EngineConfig,
}

impl ScoringEngine {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn StreakNotifier>,
        config: EngineConfig,
    ) -> Self {
        Self {
            progress: ProgressRepository::new(store.clone()),
            leaderboards: LeaderboardRepository::new(store),
            clock,
            notifier,
            config,
        }
    }

    pub fn progress(&self) -> &ProgressRepository {
        &self.progress
    }

    pub fn leaderboards(&self) -> &LeaderboardRepository {
        &self.leaderboards
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Records that `username` solved the daily puzzle published for `puzzle_day` (`M-D-YYYY`).
    pub async fn record_daily_solve(
        &self,
        username: &str,
        puzzle_day: &str,
    ) -> ScoreResult<SolveOutcome> {
        validate("username", username)?;
        validate("puzzle day", puzzle_day)?;
        let puzzle_day = DayKey::parse(puzzle_day)?;

        self.record_daily_solve_on(username, puzzle_day).await
    }

    #[instrument(skip(self), fields(day = %puzzle_day))]
    pub async fn record_daily_solve_on(
        &self,
        username: &str,
        puzzle_day: DayKey,
    ) -> ScoreResult<SolveOutcome> {
        validate("username", username)?;
        let today = self.clock.today();

        if !self.progress.add_solved_day(username, &puzzle_day).await? {
            tracing::debug!(%today, "puzzle already solved, resyncing leaderboards");
            self.update_all_daily_leaderboards(username).await?;
            return Ok(SolveOutcome::AlreadySolved);
        }

        let bucket = match self.config.bucket {
            SolveBucket::SolveDate => today,
            SolveBucket::PuzzleDate => puzzle_day,
        };
        self.progress.increment_daily_count(username, &bucket).await?;

        let total_solved = self.progress.get_total_solved_count(username).await?;
        self.leaderboards
            .upsert_score(Board::DailyTotal, username, total_solved)
            .await?;

        let streak = if puzzle_day == today {
            Some(self.advance_streak(username, today).await?)
        } else {
            None
        };

        tracing::info!(
            %today,
            total_solved,
            streak = streak.map(|s| s.current),
            "daily solve recorded"
        );

        Ok(SolveOutcome::Recorded {
            total_solved,
            streak,
        })
    }

    /// Streak transition for a first solve of today's puzzle: continue when the last solve was
    /// yesterday, otherwise restart at 1. A last solve dated today means a concurrent submit
    /// already advanced the streak, so the stored value is kept.
    #[instrument(skip(self))]
    async fn advance_streak(&self, username: &str, today: DayKey) -> ScoreResult<StreakUpdate> {
        let last_solved = self.progress.get_last_solved_date(username).await?;
        let previous = self.progress.get_streak(username).await?;

        let already_advanced = last_solved == Some(today);
        let current = match last_solved {
            Some(last) if last == today => previous.max(1),
            Some(last) if last.is_day_before(&today) => previous + 1,
            _ => 1,
        };
        let continued =
            already_advanced || last_solved.is_some_and(|last| last.is_day_before(&today));
        self.progress.set_streak(username, current).await?;

        let mut longest = self.progress.get_longest_streak(username).await?;
        if current > longest {
            self.progress.set_longest_streak(username, current).await?;
            longest = current;
        }

        self.leaderboards
            .upsert_score(Board::DailyStreak, username, current)
            .await?;
        self.progress.set_last_solved_date(username, &today).await?;

        if already_advanced {
            tracing::debug!(streak = current, "streak already advanced today");
        } else {
            self.emit(StreakEvent {
                username: username.to_string(),
                streak: current,
                context: self.config.context.clone(),
            });
        }

        Ok(StreakUpdate {
            previous,
            current,
            longest,
            continued,
        })
    }

    /// Hands `event` to the notifier on its own task; the solve never waits on delivery.
    fn emit(&self, event: StreakEvent) {
        let notifier = self.notifier.clone();
        tokio::spawn(
            async move {
                let (username, streak) = (event.username.clone(), event.streak);
                if let Err(e) = notifier.notify(event).await {
                    tracing::warn!(username, streak, error = ?e, "streak notification failed");
                }
            }
            .in_current_span(),
        );
    }

    /// Re-derives both daily boards from the authoritative counters.
    #[instrument(skip(self))]
    pub async fn update_all_daily_leaderboards(&self, username: &str) -> ScoreResult<()> {
        validate("username", username)?;

        self.resync(Board::DailyTotal, username).await?;
        self.resync(Board::DailyStreak, username).await?;

        Ok(())
    }

    /// Pushes the counter behind `board` for `username`, zero included.
    #[instrument(skip(self), fields(board = %board))]
    pub async fn resync(&self, board: Board, username: &str) -> ScoreResult<i64> {
        validate("username", username)?;

        let score = self.counter(board, username).await?;
        self.leaderboards.upsert_score(board, username, score).await?;

        Ok(score)
    }

    async fn counter(&self, board: Board, username: &str) -> ScoreResult<i64> {
        let score = match board {
            Board::DailyTotal => self.progress.get_total_solved_count(username).await?,
            Board::DailyStreak => self.progress.get_streak(username).await?,
            Board::UserGeneratedSolved => {
                self.progress
                    .get_user_generated_solved_count(username)
                    .await?
            }
            Board::UserCreatedCount => self.progress.get_created_count(username).await?,
        };

        Ok(score)
    }

    /// Records a solve of a user-generated puzzle. Returns how many distinct ones the user has
    /// solved.
    #[instrument(skip(self))]
    pub async fn record_user_generated_solve(
        &self,
        username: &str,
        puzzle_id: &str,
    ) -> ScoreResult<i64> {
        validate("username", username)?;
        validate("puzzle id", puzzle_id)?;

        let solved = self
            .progress
            .add_user_generated_solved(username, puzzle_id)
            .await? as i64;
        self.leaderboards
            .upsert_score(Board::UserGeneratedSolved, username, solved)
            .await?;

        Ok(solved)
    }

    /// Records a newly created puzzle. Returns how many the user has created.
    #[instrument(skip(self))]
    pub async fn record_puzzle_created(&self, username: &str, puzzle_id: &str) -> ScoreResult<i64> {
        validate("username", username)?;
        validate("puzzle id", puzzle_id)?;

        let created = self.progress.add_created_puzzle(username, puzzle_id).await? as i64;
        self.leaderboards
            .upsert_score(Board::UserCreatedCount, username, created)
            .await?;

        Ok(created)
    }

    /// Top entries of `board` for display. The viewer's own entry is resynced first so they
    /// never see a stale score of their own; a viewer with a zero counter and no entry is left
    /// off the board.
    #[instrument(skip(self), fields(board = %board))]
    pub async fn leaderboard(
        &self,
        board: Board,
        limit: Option<usize>,
        viewer: Option<&str>,
    ) -> ScoreResult<Vec<LeaderboardEntry>> {
        if let Some(viewer) = viewer {
            validate("viewer", viewer)?;

            let score = self.counter(board, viewer).await?;
            if score != 0 || self.leaderboards.get_score(board, viewer).await?.is_some() {
                self.leaderboards.upsert_score(board, viewer, score).await?;
            }
        }

        let limit = limit.unwrap_or(self.config.leaderboard_limit);
        Ok(self.leaderboards.get_top_n(board, limit).await?)
    }

    pub async fn stats(&self, username: &str) -> ScoreResult<UserStats> {
        validate("username", username)?;
        Ok(self.progress.get_stats(username).await?)
    }
}

fn validate(what: &str, value: &str) -> ScoreResult<()> {
    if value.trim().is_empty() {
        return Err(ScoreErr::InvalidArgument(format!("{what} must not be empty")));
    }

    Ok(())
}
