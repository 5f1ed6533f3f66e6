pub mod day;
pub mod leaderboard;
pub mod progress;
