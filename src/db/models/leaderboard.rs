use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DAILY_STREAK_LEADERBOARD, DAILY_TOTAL_LEADERBOARD, USER_CREATED_LEADERBOARD,
    USER_GEN_SOLVED_LEADERBOARD,
};

/// One of the four independently ranked boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Board {
    /// Total daily puzzles solved.
    DailyTotal,
    /// Current consecutive-day streak.
    DailyStreak,
    /// User-generated puzzles solved.
    UserGeneratedSolved,
    /// Puzzles the user has created.
    UserCreatedCount,
}

impl Board {
    pub const ALL: [Board; 4] = [
        Board::DailyTotal,
        Board::DailyStreak,
        Board::UserGeneratedSolved,
        Board::UserCreatedCount,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Board::DailyTotal => DAILY_TOTAL_LEADERBOARD,
            Board::DailyStreak => DAILY_STREAK_LEADERBOARD,
            Board::UserGeneratedSolved => USER_GEN_SOLVED_LEADERBOARD,
            Board::UserCreatedCount => USER_CREATED_LEADERBOARD,
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: i64,
}

impl From<(String, i64)> for LeaderboardEntry {
    fn from((username, score): (String, i64)) -> Self {
        Self { username, score }
    }
}
