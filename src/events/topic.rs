//! Typed broadcast topic: one per notification channel that carries a payload.

use tokio::sync::broadcast;

/// Broadcast channel for a single payload type.
///
/// Same semantics as the aggregate bus stream: non-blocking publish, no
/// persistence, lagging receivers skip the oldest items.
#[derive(Debug)]
pub struct Topic<T> {
    tx: broadcast::Sender<T>,
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Clone> Topic<T> {
    /// Creates a topic; capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes to current receivers; dropped if there are none.
    pub fn publish(&self, value: T) {
        let _ = self.tx.send(value);
    }

    /// Creates a receiver observing values published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }
}
