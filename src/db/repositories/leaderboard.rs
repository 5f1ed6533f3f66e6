use std::sync::Arc;

use tracing::instrument;

use crate::db::StoreResult;
use crate::db::models::leaderboard::{Board, LeaderboardEntry};
use crate::db::repositories::Repository;
use crate::db::store::KeyValueStore;

/// Ranked boards. Scores here are a cache of the progress counters and are always written as
/// absolute values.
#[derive(Clone)]
pub struct LeaderboardRepository {
    store: Arc<dyn KeyValueStore>,
}

impl Repository for LeaderboardRepository {
    fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}

impl LeaderboardRepository {
    #[instrument(skip(self), fields(board = %board))]
    pub async fn upsert_score(&self, board: Board, username: &str, score: i64) -> StoreResult<()> {
        self.store.zadd(board.key(), username, score).await?;
        tracing::debug!(username, score, "leaderboard score set");

        Ok(())
    }

    /// Top `limit` entries, highest score first.
    #[instrument(skip(self), fields(board = %board))]
    pub async fn get_top_n(
        &self,
        board: Board,
        limit: usize,
    ) -> StoreResult<Vec<LeaderboardEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        Ok(self
            .store
            .zrevrange_withscores(board.key(), 0, limit - 1)
            .await?
            .into_iter()
            .map(LeaderboardEntry::from)
            .collect())
    }

    pub async fn get_score(&self, board: Board, username: &str) -> StoreResult<Option<i64>> {
        self.store.zscore(board.key(), username).await
    }

    /// 1-based position on `board`, if the user has an entry.
    pub async fn get_rank(&self, board: Board, username: &str) -> StoreResult<Option<usize>> {
        Ok(self
            .store
            .zrevrank(board.key(), username)
            .await?
            .map(|rank| rank + 1))
    }

    pub async fn len(&self, board: Board) -> StoreResult<usize> {
        self.store.zcard(board.key()).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::db::memory::MemoryStore;

    fn repo() -> LeaderboardRepository {
        LeaderboardRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_top_n_is_descending() {
        let repo = repo();
        for (user, score) in [("alice", 4), ("bob", 9), ("carol", 1), ("dave", 6)] {
            repo.upsert_score(Board::DailyTotal, user, score).await.unwrap();
        }

        let top = repo.get_top_n(Board::DailyTotal, 3).await.unwrap();
        let scores: Vec<i64> = top.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![9, 6, 4]);
        assert!(scores.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(top[0].username, "bob");
    }

    #[tokio::test]
    async fn test_upsert_is_absolute() {
        let repo = repo();
        repo.upsert_score(Board::DailyStreak, "alice", 5).await.unwrap();
        repo.upsert_score(Board::DailyStreak, "alice", 2).await.unwrap();

        assert_eq!(repo.get_score(Board::DailyStreak, "alice").await.unwrap(), Some(2));
        assert_eq!(repo.len(Board::DailyStreak).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_boards_are_independent() {
        let repo = repo();
        repo.upsert_score(Board::UserCreatedCount, "alice", 3).await.unwrap();

        for board in Board::ALL {
            let expects = if board == Board::UserCreatedCount { 1 } else { 0 };
            assert_eq!(repo.len(board).await.unwrap(), expects, "{board}");
        }
    }

    #[tokio::test]
    async fn test_rank_and_empty_limits() {
        let repo = repo();
        repo.upsert_score(Board::UserGeneratedSolved, "alice", 2).await.unwrap();
        repo.upsert_score(Board::UserGeneratedSolved, "bob", 8).await.unwrap();

        assert_eq!(repo.get_rank(Board::UserGeneratedSolved, "bob").await.unwrap(), Some(1));
        assert_eq!(repo.get_rank(Board::UserGeneratedSolved, "alice").await.unwrap(), Some(2));
        assert_eq!(repo.get_rank(Board::UserGeneratedSolved, "carol").await.unwrap(), None);
        assert!(repo.get_top_n(Board::UserGeneratedSolved, 0).await.unwrap().is_empty());
        assert_eq!(repo.get_top_n(Board::UserGeneratedSolved, 50).await.unwrap().len(), 2);
    }
}
