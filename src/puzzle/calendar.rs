use std::collections::{BTreeMap, HashMap};

use tracing::instrument;

use crate::db::models::day::DayKey;
use crate::puzzle::{Puzzle, PuzzleErr, PuzzleResult};

/// Maps a calendar day to that day's puzzle.
pub trait PuzzleCalendar: Send + Sync {
    fn puzzle_for(&self, day: &DayKey) -> Option<Puzzle>;

    /// The day's puzzle, or the fixed default chain when none was published.
    fn puzzle_or_default(&self, day: &DayKey) -> Puzzle {
        self.puzzle_for(day).unwrap_or_else(|| {
            tracing::debug!(%day, "no puzzle for day, serving default chain");
            Puzzle::default_chain()
        })
    }

    /// Surfaces a missing puzzle as [`PuzzleErr::NoPuzzle`] instead of falling back.
    fn require_puzzle(&self, day: &DayKey) -> PuzzleResult<Puzzle> {
        self.puzzle_for(day).ok_or(PuzzleErr::NoPuzzle(*day))
    }
}

/// Calendar held in memory, usually loaded from a `{"M-D-YYYY": ["word", ...]}` JSON document.
#[derive(Debug, Clone, Default)]
pub struct StaticCalendar {
    puzzles: HashMap<DayKey, Puzzle>,
}

impl StaticCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: DayKey, puzzle: Puzzle) -> Option<Puzzle> {
        self.puzzles.insert(day, puzzle)
    }

    /// Every entry is validated; one bad day key or chain rejects the whole document.
    #[instrument(skip(raw))]
    pub fn from_json(raw: &str) -> PuzzleResult<Self> {
        let entries: BTreeMap<String, Vec<String>> = serde_json::from_str(raw)?;

        let mut calendar = Self::new();
        for (day, words) in entries {
            let day = DayKey::parse(&day)?;
            calendar.insert(day, Puzzle::new(words)?);
        }

        tracing::info!(days = calendar.len(), "loaded puzzle calendar");
        Ok(calendar)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}

impl PuzzleCalendar for StaticCalendar {
    fn puzzle_for(&self, day: &DayKey) -> Option<Puzzle> {
        self.puzzles.get(day).cloned()
    }
}
