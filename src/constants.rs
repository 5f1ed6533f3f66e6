pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const ENV_PREFIX: &str = "WORDCHAIN_";
pub const DEFAULT_LOG_FILTER: &str = "wordchain_streaks=debug,redis=info,info";

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

// Hash fields, shared with data written by the original plugin.
pub const FIELD_LIST: &str = "list";
pub const FIELD_STREAK: &str = "streak";
pub const FIELD_LONGEST: &str = "longest";
pub const FIELD_DATE: &str = "date";
pub const FIELD_FLAIR_RANK: &str = "rank";

// Sorted-set keys for the four boards.
pub const DAILY_TOTAL_LEADERBOARD: &str = "dailyTotalLeaderboard";
pub const DAILY_STREAK_LEADERBOARD: &str = "dailyStreakLeaderboard";
pub const USER_GEN_SOLVED_LEADERBOARD: &str = "userGenSolvedLeaderboard";
pub const USER_CREATED_LEADERBOARD: &str = "userCreatedPuzzleLeaderboard";

/// Served when the calendar has nothing for a given day.
pub const DEFAULT_PUZZLE: [&str; 5] = ["rain", "coat", "tail", "light", "house"];
