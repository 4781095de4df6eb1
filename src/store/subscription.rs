//! Snapshot subscriptions.

use challengers_rules::{Game, GameId};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::store::StoreError;

/// A change to one game document.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Full snapshot after a write.
    Snapshot(Game),
    /// The document is gone.
    Deleted(GameId),
}

impl GameEvent {
    /// The snapshot, unless the game was deleted.
    pub fn game(&self) -> Option<&Game> {
        match self {
            Self::Snapshot(game) => Some(game),
            Self::Deleted(_) => None,
        }
    }
}

/// A stream of snapshots: the current value first, then every change.
#[derive(Debug)]
pub struct Subscription<T> {
    label: String,
    initial: Option<T>,
    rx: broadcast::Receiver<T>,
}

impl<T> Subscription<T>
where
    T: Clone + Send + 'static,
{
    /// Wraps a broadcast receiver, delivering `initial` before any change.
    pub fn new(label: impl Into<String>, initial: Option<T>, rx: broadcast::Receiver<T>) -> Self {
        Self {
            label: label.into(),
            initial,
            rx,
        }
    }

    /// Waits for the next snapshot.
    ///
    /// Yields an error when this subscriber fell behind and snapshots were
    /// dropped; the next call resumes with the oldest retained one. Returns
    /// `None` once the store is gone.
    pub async fn next(&mut self) -> Option<Result<T, StoreError>> {
        if let Some(first) = self.initial.take() {
            return Some(Ok(first));
        }
        match self.rx.recv().await {
            Ok(value) => Some(Ok(value)),
            Err(RecvError::Lagged(skipped)) => {
                warn!(label = %self.label, skipped, "Subscriber lagged");
                Some(Err(StoreError::backend(format!(
                    "subscription '{}' skipped {} snapshots",
                    self.label, skipped
                ))))
            }
            Err(RecvError::Closed) => {
                debug!(label = %self.label, "Subscription closed");
                None
            }
        }
    }

    /// Drives the subscription on a background task, calling `on_update` for
    /// every snapshot and `on_error` for every delivery failure.
    ///
    /// The task stops when the returned handle is dropped.
    pub fn on_update<U, E>(mut self, mut on_update: U, mut on_error: E) -> SubscriptionHandle
    where
        U: FnMut(T) + Send + 'static,
        E: FnMut(StoreError) + Send + 'static,
    {
        let task = tokio::spawn(async move {
            while let Some(delivery) = self.next().await {
                match delivery {
                    Ok(value) => on_update(value),
                    Err(e) => on_error(e),
                }
            }
        });
        SubscriptionHandle::new(task)
    }
}

/// Keeps a background subscription alive; aborts it on drop.
#[derive(Debug, derive_new::new)]
pub struct SubscriptionHandle {
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    /// Whether the listener has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
