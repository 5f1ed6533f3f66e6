//! Daily-streak and leaderboard scoring for a word-chain puzzle game.
//!
//! The [`ScoringEngine`] records puzzle solves against a [`KeyValueStore`], keeps per-user
//! progress counters authoritative, and mirrors them into four ranked leaderboards.

pub mod constants;
pub mod db;
pub mod puzzle;
pub mod scoring;
pub mod util;

pub use db::models::day::DayKey;
pub use db::models::leaderboard::{Board, LeaderboardEntry};
pub use db::store::KeyValueStore;
pub use scoring::engine::{EngineConfig, ScoringEngine, SolveBucket, SolveOutcome};
pub use scoring::{ScoreErr, ScoreResult};
