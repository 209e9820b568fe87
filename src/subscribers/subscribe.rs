//! # Notification observer trait.
//!
//! [`Subscribe`] is the extension point for plugging observers into the channel
//! at build time. Each observer is driven by a dedicated worker fed by a bounded
//! queue owned by the [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Contract
//! - Observers may be slow (I/O, batching); they never block the channel or each other.
//! - Each observer **declares** its queue capacity via [`Subscribe::queue_capacity`].
//!   On overflow the notification is dropped for that observer only (warning logged).
//! - Notifications arrive in publish order per observer.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use fieldlink::{Notification, Subscribe};
//!
//! struct AlertCounter(std::sync::atomic::AtomicUsize);
//!
//! #[async_trait]
//! impl Subscribe for AlertCounter {
//!     async fn on_notification(&self, n: &Notification) {
//!         if matches!(n, Notification::SystemAlert(_)) {
//!             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         }
//!     }
//!     fn name(&self) -> &'static str { "alert-counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Notification;

/// Observer of every notification the channel publishes.
///
/// Called from an observer-dedicated worker task. Panics are caught and logged;
/// the worker keeps processing subsequent notifications.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single notification.
    async fn on_notification(&self, notification: &Notification);

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this observer's queue (clamped to at least 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
