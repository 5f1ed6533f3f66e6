use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::db::StoreErr;

/// Emitted whenever a first solve of today's puzzle moves a user's streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakEvent {
    pub username: String,
    pub streak: i64,
    /// Community the solve happened in, when the host knows it.
    pub context: Option<String>,
}

pub type NotifyResult<T> = core::result::Result<T, NotifyErr>;

#[derive(Debug, Error)]
pub enum NotifyErr {
    #[error("notification channel closed")]
    ChannelClosed,

    #[error(transparent)]
    Store(#[from] StoreErr),

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait StreakNotifier: Send + Sync {
    async fn notify(&self, event: StreakEvent) -> NotifyResult<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl StreakNotifier for NoopNotifier {
    async fn notify(&self, _event: StreakEvent) -> NotifyResult<()> {
        Ok(())
    }
}

/// Hands events to a receiver without waiting on whatever processes them.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: UnboundedSender<StreakEvent>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, UnboundedReceiver<StreakEvent>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl StreakNotifier for ChannelNotifier {
    async fn notify(&self, event: StreakEvent) -> NotifyResult<()> {
        self.tx.send(event).map_err(|_| NotifyErr::ChannelClosed)
    }
}

/// Drains `rx` into `sink` until every sender is dropped. Failures are logged and skipped.
#[instrument(skip_all)]
pub fn spawn_notifier_worker(
    mut rx: UnboundedReceiver<StreakEvent>,
    sink: Arc<dyn StreakNotifier>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let username = event.username.clone();
            if let Err(e) = sink.notify(event).await {
                tracing::warn!(username, error = ?e, "streak notification failed");
            }
        }

        tracing::debug!("streak notification channel closed, worker exiting");
    })
}
