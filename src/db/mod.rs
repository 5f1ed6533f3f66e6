use thiserror::Error;

pub mod keys;
pub mod memory;
pub mod models;
pub mod redis;
pub mod repositories;
pub mod store;

pub mod prelude {
    pub use crate::db::{StoreErr, StoreResult};

    pub use crate::db::keys::UserKey;
    pub use crate::db::memory::MemoryStore;
    pub use crate::db::redis::RedisStore;
    pub use crate::db::store::KeyValueStore;

    pub use crate::db::models::day::{DayKey, DayKeyErr};
    pub use crate::db::models::leaderboard::{Board, LeaderboardEntry};
    pub use crate::db::models::progress::{SolvedSet, UserStats};

    pub use crate::db::repositories::leaderboard::LeaderboardRepository;
    pub use crate::db::repositories::progress::ProgressRepository;
}

pub type StoreResult<T> = core::result::Result<T, StoreErr>;

#[derive(Debug, Error)]
pub enum StoreErr {
    #[error(transparent)]
    RedisClientError(#[from] ::redis::RedisError),

    #[error("malformed json in '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("non-integer value '{value}' in '{key}'")]
    NotAnInteger { key: String, value: String },

    #[error("range index {index} out of bounds for '{key}'")]
    BadRange { key: String, index: usize },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
