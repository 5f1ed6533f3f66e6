use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::instrument;

use crate::db::store::KeyValueStore;
use crate::db::{StoreErr, StoreResult};

/// Redis-backed [`KeyValueStore`].
///
/// $: `redis-server --port 6379 --save "300 10" --appendonly yes --appendfsync everysec`
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    #[instrument]
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        tracing::debug!(redis_url, "connecting to redis server");

        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        Ok(Self { manager })
    }

    pub fn from_manager(manager: ConnectionManager) -> Self {
        Self { manager }
    }
}

impl core::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    #[instrument(skip(self), level = "trace")]
    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let mut conn = self.manager.clone();
        Ok(conn.hget(key, field).await?)
    }

    #[instrument(skip(self, value), level = "trace")]
    async fn hset(&self, key: &str, field: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.manager.clone();
        let _: () = conn.hset(key, field, value).await?;
        Ok(())
    }

    #[instrument(skip(self), level = "trace")]
    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let mut conn = self.manager.clone();
        Ok(conn.hgetall(key).await?)
    }

    #[instrument(skip(self), level = "trace")]
    async fn hincr(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        let mut conn = self.manager.clone();
        Ok(conn.hincr(key, field, delta).await?)
    }

    #[instrument(skip(self), level = "trace")]
    async fn zadd(&self, key: &str, member: &str, score: i64) -> StoreResult<()> {
        let mut conn = self.manager.clone();
        let _: () = conn.zadd(key, member, score).await?;
        Ok(())
    }

    #[instrument(skip(self), level = "trace")]
    async fn zscore(&self, key: &str, member: &str) -> StoreResult<Option<i64>> {
        let mut conn = self.manager.clone();
        let score: Option<f64> = conn.zscore(key, member).await?;
        Ok(score.map(|s| s as i64))
    }

    #[instrument(skip(self), level = "trace")]
    async fn zrevrange_withscores(
        &self,
        key: &str,
        start: usize,
        stop: usize,
    ) -> StoreResult<Vec<(String, i64)>> {
        let start = isize::try_from(start).map_err(|_| bad_range(key, start))?;
        let stop = isize::try_from(stop).map_err(|_| bad_range(key, stop))?;

        let mut conn = self.manager.clone();
        let entries: Vec<(String, f64)> = conn.zrevrange_withscores(key, start, stop).await?;

        Ok(entries
            .into_iter()
            .map(|(member, score)| (member, score as i64))
            .collect())
    }

    #[instrument(skip(self), level = "trace")]
    async fn zrevrank(&self, key: &str, member: &str) -> StoreResult<Option<usize>> {
        let mut conn = self.manager.clone();
        Ok(conn.zrevrank(key, member).await?)
    }

    #[instrument(skip(self), level = "trace")]
    async fn zcard(&self, key: &str) -> StoreResult<usize> {
        let mut conn = self.manager.clone();
        Ok(conn.zcard(key).await?)
    }
}

fn bad_range(key: &str, index: usize) -> StoreErr {
    StoreErr::BadRange {
        key: key.to_string(),
        index,
    }
}
