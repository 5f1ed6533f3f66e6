use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::db::store::KeyValueStore;
use crate::db::{StoreErr, StoreResult};

/// In-process [`KeyValueStore`] that mirrors the redis semantics the scoring layer relies on.
#[derive(Debug, Default)]
pub struct MemoryStore {
    hashes: RwLock<HashMap<String, HashMap<String, String>>>,
    zsets: RwLock<HashMap<String, HashMap<String, i64>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members sorted the way `ZREVRANGE` returns them: score descending, then member
    /// descending for equal scores.
    async fn ranked(&self, key: &str) -> Vec<(String, i64)> {
        let zsets = self.zsets.read().await;
        let mut entries: Vec<(String, i64)> = zsets
            .get(key)
            .map(|set| set.iter().map(|(m, s)| (m.clone(), *s)).collect())
            .unwrap_or_default();

        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
        entries
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let hashes = self.hashes.read().await;
        Ok(hashes.get(key).and_then(|h| h.get(field)).cloned())
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> StoreResult<()> {
        let mut hashes = self.hashes.write().await;
        hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());

        Ok(())
    }

    async fn hgetall(&self, key: &str) -> StoreResult<HashMap<String, String>> {
        let hashes = self.hashes.read().await;
        Ok(hashes.get(key).cloned().unwrap_or_default())
    }

    #[instrument(skip(self), level = "trace")]
    async fn hincr(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        let mut hashes = self.hashes.write().await;
        let hash = hashes.entry(key.to_string()).or_default();

        let current = match hash.get(field) {
            Some(raw) => raw.parse::<i64>().map_err(|_| StoreErr::NotAnInteger {
                key: key.to_string(),
                value: raw.clone(),
            })?,
            None => 0,
        };

        let next = current + delta;
        hash.insert(field.to_string(), next.to_string());

        Ok(next)
    }

    async fn zadd(&self, key: &str, member: &str, score: i64) -> StoreResult<()> {
        let mut zsets = self.zsets.write().await;
        zsets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);

        Ok(())
    }

    async fn zscore(&self, key: &str, member: &str) -> StoreResult<Option<i64>> {
        let zsets = self.zsets.read().await;
        Ok(zsets.get(key).and_then(|set| set.get(member)).copied())
    }

    async fn zrevrange_withscores(
        &self,
        key: &str,
        start: usize,
        stop: usize,
    ) -> StoreResult<Vec<(String, i64)>> {
        if stop < start {
            return Ok(Vec::new());
        }

        Ok(self
            .ranked(key)
            .await
            .into_iter()
            .skip(start)
            .take(stop - start + 1)
            .collect())
    }

    async fn zrevrank(&self, key: &str, member: &str) -> StoreResult<Option<usize>> {
        Ok(self.ranked(key).await.iter().position(|(m, _)| m == member))
    }

    async fn zcard(&self, key: &str) -> StoreResult<usize> {
        let zsets = self.zsets.read().await;
        Ok(zsets.get(key).map(|set| set.len()).unwrap_or_default())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_missing_reads_are_empty() {
        let store = MemoryStore::new();

        assert_eq!(store.hget("user:nobody:streak", "streak").await.unwrap(), None);
        assert!(store.hgetall("user:nobody:dailySolvedCount").await.unwrap().is_empty());
        assert_eq!(store.zscore("dailyTotalLeaderboard", "nobody").await.unwrap(), None);
        assert_eq!(store.zcard("dailyTotalLeaderboard").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_hincr_creates_and_accumulates() {
        let store = MemoryStore::new();

        assert_eq!(store.hincr("k", "f", 1).await.unwrap(), 1);
        assert_eq!(store.hincr("k", "f", 4).await.unwrap(), 5);
        assert_eq!(store.hget("k", "f").await.unwrap().as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_hincr_rejects_non_integer() {
        let store = MemoryStore::new();
        store.hset("k", "f", "lots").await.unwrap();

        let err = store.hincr("k", "f", 1).await.unwrap_err();
        assert!(matches!(err, StoreErr::NotAnInteger { .. }));
    }

    #[tokio::test]
    async fn test_zrevrange_orders_like_redis() {
        let store = MemoryStore::new();
        store.zadd("board", "alice", 3).await.unwrap();
        store.zadd("board", "bob", 7).await.unwrap();
        store.zadd("board", "carol", 3).await.unwrap();
        store.zadd("board", "dave", 1).await.unwrap();

        // zadd overwrites rather than increments
        store.zadd("board", "dave", 2).await.unwrap();

        let top = store.zrevrange_withscores("board", 0, 2).await.unwrap();
        assert_eq!(
            top,
            vec![
                ("bob".to_string(), 7),
                ("carol".to_string(), 3),
                ("alice".to_string(), 3),
            ]
        );

        assert_eq!(store.zrevrank("board", "dave").await.unwrap(), Some(3));
        assert_eq!(store.zrevrank("board", "erin").await.unwrap(), None);
        assert_eq!(store.zscore("board", "dave").await.unwrap(), Some(2));
    }
}
