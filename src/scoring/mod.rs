use thiserror::Error;

use crate::db::StoreErr;
use crate::db::models::day::DayKeyErr;

pub mod clock;
pub mod engine;
pub mod flair;
pub mod notify;


pub type ScoreResult<T> = core::result::Result<T, ScoreErr>;

#[derive(Debug, Error)]
pub enum ScoreErr {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Store(#[from] StoreErr),
}

impl From<DayKeyErr> for ScoreErr {
    fn from(value: DayKeyErr) -> Self {
        ScoreErr::InvalidArgument(value.to_string())
    }
}
