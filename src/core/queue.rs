//! # Pending-update queue.
//!
//! [`UpdateQueue`] buffers envelopes that could not be delivered yet. It is a
//! strict FIFO: no deduplication and no reordering by priority.
//!
//! The drain loop works on the head **in place**: it delivers a clone of the
//! head `Arc` and only pops it after the transport accepted it. A failed head
//! therefore never leaves the queue, nothing behind it can overtake it, and the
//! observable length never drops until the head succeeds.
//!
//! ```text
//! enqueue ──► [ e1 | e2 | e3 ] ──► front() ──► transport.send(e1)
//!                                               ├─ Ok  ─► complete_head(e1) ─► dispatch
//!                                               └─ Err ─► e1 stays at head, drain stops
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::updates::Envelope;

/// FIFO of undelivered envelopes.
#[derive(Debug, Default)]
pub(crate) struct UpdateQueue {
    items: VecDeque<Arc<Envelope>>,
}

impl UpdateQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends to the tail.
    pub(crate) fn enqueue(&mut self, envelope: Arc<Envelope>) {
        self.items.push_back(envelope);
    }

    /// Returns a handle to the head without removing it.
    pub(crate) fn front(&self) -> Option<Arc<Envelope>> {
        self.items.front().cloned()
    }

    /// Pops the head if it is still `delivered`.
    ///
    /// Returns `false` when the queue was cleared (or the head replaced) while
    /// the delivery was in flight.
    pub(crate) fn complete_head(&mut self, delivered: &Arc<Envelope>) -> bool {
        match self.items.front() {
            Some(head) if Arc::ptr_eq(head, delivered) => {
                self.items.pop_front();
                true
            }
            _ => false,
        }
    }

    /// Discards everything; returns how many envelopes were dropped.
    pub(crate) fn clear(&mut self) -> usize {
        let n = self.items.len();
        self.items.clear();
        n
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}

/// Single in-flight guard for the drain loop.
///
/// Acquired with a compare-exchange on the shared flag; released on drop.
pub(crate) struct DrainGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> DrainGuard<'a> {
    /// Returns `None` if a drain is already running.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::updates::Priority;
    use serde_json::json;

    fn env(n: u32) -> Arc<Envelope> {
        Arc::new(Envelope::custom("tick", "u1", json!({ "n": n }), Some(Priority::Low)).unwrap())
    }

    #[test]
    fn fifo_regardless_of_priority() {
        let mut q = UpdateQueue::new();
        let low = env(1);
        let high = Arc::new(
            Envelope::custom("tick", "u1", json!({ "n": 2 }), Some(Priority::High)).unwrap(),
        );
        q.enqueue(low.clone());
        q.enqueue(high.clone());

        assert!(Arc::ptr_eq(&q.front().unwrap(), &low));
        assert!(q.complete_head(&low));
        assert!(Arc::ptr_eq(&q.front().unwrap(), &high));
    }

    #[test]
    fn failed_head_stays_in_place() {
        let mut q = UpdateQueue::new();
        let (a, b) = (env(1), env(2));
        q.enqueue(a.clone());
        q.enqueue(b);

        let head = q.front().unwrap();
        // delivery failed: nothing is completed
        assert_eq!(q.len(), 2);
        assert!(Arc::ptr_eq(&head, &a));
        assert!(Arc::ptr_eq(&q.front().unwrap(), &a));
    }

    #[test]
    fn complete_head_after_clear_is_ignored() {
        let mut q = UpdateQueue::new();
        let a = env(1);
        q.enqueue(a.clone());
        let head = q.front().unwrap();
        assert_eq!(q.clear(), 1);

        let b = env(2);
        q.enqueue(b.clone());
        assert!(!q.complete_head(&head));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn drain_guard_is_exclusive() {
        let flag = AtomicBool::new(false);
        let first = DrainGuard::acquire(&flag);
        assert!(first.is_some());
        assert!(DrainGuard::acquire(&flag).is_none());
        drop(first);
        assert!(DrainGuard::acquire(&flag).is_some());
    }
}
