use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::db::store::KeyValueStore;
use crate::db::{StoreErr, StoreResult};

pub mod leaderboard;
pub mod progress;

/// Base accessors shared by the store-backed repositories.
#[async_trait]
pub trait Repository: Send + Sync {
    fn new(store: Arc<dyn KeyValueStore>) -> Self
    where
        Self: Sized;

    fn store(&self) -> &dyn KeyValueStore;

    /// Reads an integer hash field, treating a missing field as zero.
    #[instrument(skip(self), level = "trace")]
    async fn read_int(&self, key: &str, field: &str) -> StoreResult<i64> {
        match self.store().hget(key, field).await? {
            Some(raw) => parse_int(key, &raw),
            None => Ok(0),
        }
    }

    async fn write_int(&self, key: &str, field: &str, value: i64) -> StoreResult<()> {
        self.store().hset(key, field, &value.to_string()).await
    }

    /// Reads a JSON string array stored in a hash field; missing reads as empty.
    #[instrument(skip(self), level = "trace")]
    async fn read_list(&self, key: &str, field: &str) -> StoreResult<Vec<String>> {
        match self.store().hget(key, field).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreErr::Json {
                key: key.to_string(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn write_list(&self, key: &str, field: &str, items: &[String]) -> StoreResult<()> {
        let raw = serde_json::to_string(items).map_err(|source| StoreErr::Json {
            key: key.to_string(),
            source,
        })?;

        self.store().hset(key, field, &raw).await
    }

    /// Appends `item` to a stored list unless it is already there. Returns the list length and
    /// whether the item was newly added.
    async fn insert_into_list(
        &self,
        key: &str,
        field: &str,
        item: &str,
    ) -> StoreResult<(usize, bool)> {
        let mut items = self.read_list(key, field).await?;
        if items.iter().any(|i| i == item) {
            return Ok((items.len(), false));
        }

        items.push(item.to_string());
        self.write_list(key, field, &items).await?;

        Ok((items.len(), true))
    }
}

pub(crate) fn parse_int(key: &str, raw: &str) -> StoreResult<i64> {
    raw.trim().parse::<i64>().map_err(|_| StoreErr::NotAnInteger {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
