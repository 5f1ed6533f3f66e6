pub mod env;
pub mod tracing;

use std::sync::Arc;

use crate::db::redis::RedisStore;
use crate::db::store::KeyValueStore;
use crate::scoring::engine::ScoringEngine;
use crate::scoring::notify::StreakNotifier;
use crate::util::env::Env;

pub type BootstrapResult<T> = core::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Wires a redis-backed engine from the environment: config, clock and connection.
pub async fn engine_from_env(notifier: Arc<dyn StreakNotifier>) -> BootstrapResult<ScoringEngine> {
    let env = Env::new()?;
    let clock = env.clock()?;
    let store: Arc<dyn KeyValueStore> = Arc::new(RedisStore::connect(&env.redis_url).await?);

    ::tracing::info!(
        redis_url = %env.redis_url,
        bucket = ?env.solve_bucket,
        "scoring engine configured"
    );

    Ok(ScoringEngine::new(
        store,
        Arc::new(clock),
        notifier,
        env.engine_config(),
    ))
}
