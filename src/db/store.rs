use std::collections::HashMap;

use async_trait::async_trait;

use crate::db::StoreResult;

/// Hash-field and sorted-set operations the scoring layer needs from its backing store.
///
/// Absent keys and fields read as `None` (or an empty map) rather than failing.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>>;

    async fn hset(&self, key: &str, field: &str, value: &str) -> StoreResult<()>;

    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>>;

    /// Adds `delta` to an integer hash field, returning the new value.
    async fn hincr(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64>;

    /// Sets (not increments) the score of `member`.
    async fn zadd(&self, key: &str, member: &str, score: i64) -> StoreResult<()>;

    async fn zscore(&self, key: &str, member: &str) -> StoreResult<Option<i64>>;

    /// Members ordered by descending score; `start`/`stop` are inclusive ranks.
    async fn zrevrange_withscores(
        &self,
        key: &str,
        start: usize,
        stop: usize,
    ) -> StoreResult<Vec<(String, i64)>>;

    /// 0-based rank by descending score.
    async fn zrevrank(&self, key: &str, member: &str) -> StoreResult<Option<usize>>;

    async fn zcard(&self, key: &str) -> StoreResult<usize>;
}
