//! # Non-blocking fan-out to observers.
//!
//! Provides [`SubscriberSet`]: distributes notifications to multiple observers
//! without blocking the publisher.
//!
//! ## Architecture
//! ```text
//! emit(notification)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► observer1.on_notification()
//!     │    (bounded)         └──────► panic → caught, logged
//!     ├──► [queue 2] ──► worker 2 ──► observer2.on_notification()
//!     └──► [queue N] ──► worker N ──► observerN.on_notification()
//! ```
//!
//! ## Rules
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Per-observer FIFO**: each observer sees notifications in publish order
//! - **No cross-observer ordering**
//! - **Overflow**: dropped for that observer only, warning logged
//! - **Isolation**: a slow or panicking observer doesn't affect others
//!
//! `AssertUnwindSafe` is used around observer futures; an observer that panics
//! while holding its own lock can leave that state poisoned.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::Notification;
use crate::subscribers::Subscribe;

struct ObserverQueue {
    name: &'static str,
    sender: mpsc::Sender<Arc<Notification>>,
}

/// Fan-out coordinator for observers attached to the channel.
pub struct SubscriberSet {
    queues: Vec<ObserverQueue>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per observer.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut queues = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Notification>>(sub.queue_capacity().max(1));

            let handle = tokio::spawn(async move {
                while let Some(n) = rx.recv().await {
                    let fut = sub.on_notification(n.as_ref());
                    if let Err(panic) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = if let Some(msg) = panic.downcast_ref::<&'static str>() {
                            (*msg).to_string()
                        } else if let Some(msg) = panic.downcast_ref::<String>() {
                            msg.clone()
                        } else {
                            "unknown panic".to_string()
                        };
                        tracing::error!(
                            subscriber = sub.name(),
                            notification = n.kind().as_label(),
                            %info,
                            "subscriber panicked"
                        );
                    }
                }
            });
            queues.push(ObserverQueue { name, sender: tx });
            workers.push(handle);
        }
        Self { queues, workers }
    }

    /// Emits a notification to all observers.
    pub fn emit(&self, n: Notification) {
        self.emit_arc(Arc::new(n));
    }

    /// Emits a shared notification to all observers (no clone of the payload).
    pub fn emit_arc(&self, n: Arc<Notification>) {
        for queue in &self.queues {
            match queue.sender.try_send(Arc::clone(&n)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        subscriber = queue.name,
                        notification = n.kind().as_label(),
                        "subscriber queue full; notification dropped"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::warn!(
                        subscriber = queue.name,
                        notification = n.kind().as_label(),
                        "subscriber worker closed; notification dropped"
                    );
                }
            }
        }
    }

    /// Number of observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    /// True if no observers are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Closes all queues and waits for workers to drain them.
    pub async fn shutdown(self) {
        drop(self.queues);
        for h in self.workers {
            let _ = h.await;
        }
    }
}
