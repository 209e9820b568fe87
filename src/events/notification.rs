//! # Notifications emitted by the update channel.
//!
//! The [`Notification`] enum carries one variant per outbound channel, grouped
//! into four categories:
//! - **Connection events**: `Connected`, `Disconnected`, `ConnectionFailed`,
//!   `ReconnectScheduled`, `Heartbeat`
//! - **Delivery events**: `UpdateSent`, `DeliveryFailed`
//! - **Dispatched updates**: one variant per update kind plus `CustomUpdate`
//! - **Subscription intents**: `Subscription` (subscribe/unsubscribe to a user or job)
//!
//! [`NotificationKind`] is the payload-free classification; its
//! [`as_label`](NotificationKind::as_label) returns the stable channel name
//! (`"paymentStatusUpdate"`, `"connectionFailed"`, ...).
//!
//! ## Example
//! ```rust
//! use fieldlink::{Notification, NotificationKind, SubscriptionAction, SubscriptionSignal, SubscriptionTarget};
//!
//! let n = Notification::Subscription(SubscriptionSignal::new(
//!     SubscriptionAction::Subscribe,
//!     SubscriptionTarget::Job("job-42".into()),
//! ));
//! assert_eq!(n.kind(), NotificationKind::SubscribeToJob);
//! assert_eq!(n.kind().as_label(), "subscribeToJob");
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::updates::{
    AvailabilityUpdate, Envelope, EnvelopeId, JobStatusUpdate, LocationUpdate,
    PaymentStatusUpdate, SystemAlert, UpdateKind,
};

/// Whether a subscription intent asks to start or stop receiving updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionAction {
    Subscribe,
    Unsubscribe,
}

/// What a subscription intent refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubscriptionTarget {
    User(String),
    Job(String),
}

impl SubscriptionTarget {
    /// Returns the identifier regardless of target type.
    pub fn id(&self) -> &str {
        match self {
            SubscriptionTarget::User(id) | SubscriptionTarget::Job(id) => id,
        }
    }
}

/// Intent for an external transport to (un)subscribe on the server side.
///
/// The channel keeps no subscriber table; this signal is all it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionSignal {
    pub action: SubscriptionAction,
    pub target: SubscriptionTarget,
    pub at: DateTime<Utc>,
}

impl SubscriptionSignal {
    /// Creates a signal stamped with the current time.
    pub fn new(action: SubscriptionAction, target: SubscriptionTarget) -> Self {
        Self {
            action,
            target,
            at: Utc::now(),
        }
    }
}

/// Classification of notifications (stable channel names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Connected,
    Disconnected,
    ConnectionFailed,
    ReconnectScheduled,
    Heartbeat,
    UpdateSent,
    DeliveryFailed,
    JobStatusUpdate,
    PaymentStatusUpdate,
    LocationUpdate,
    AvailabilityUpdate,
    SystemAlert,
    CustomUpdate,
    Subscribe,
    Unsubscribe,
    SubscribeToJob,
    UnsubscribeFromJob,
}

impl NotificationKind {
    /// Returns the channel name used by consumers and in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            NotificationKind::Connected => "connected",
            NotificationKind::Disconnected => "disconnected",
            NotificationKind::ConnectionFailed => "connectionFailed",
            NotificationKind::ReconnectScheduled => "reconnectScheduled",
            NotificationKind::Heartbeat => "heartbeat",
            NotificationKind::UpdateSent => "updateSent",
            NotificationKind::DeliveryFailed => "deliveryFailed",
            NotificationKind::JobStatusUpdate => "jobStatusUpdate",
            NotificationKind::PaymentStatusUpdate => "paymentStatusUpdate",
            NotificationKind::LocationUpdate => "locationUpdate",
            NotificationKind::AvailabilityUpdate => "availabilityUpdate",
            NotificationKind::SystemAlert => "systemAlert",
            NotificationKind::CustomUpdate => "customUpdate",
            NotificationKind::Subscribe => "subscribe",
            NotificationKind::Unsubscribe => "unsubscribe",
            NotificationKind::SubscribeToJob => "subscribeToJob",
            NotificationKind::UnsubscribeFromJob => "unsubscribeFromJob",
        }
    }

    /// True for the channels fed by the dispatcher.
    pub fn is_dispatched_update(&self) -> bool {
        matches!(
            self,
            NotificationKind::JobStatusUpdate
                | NotificationKind::PaymentStatusUpdate
                | NotificationKind::LocationUpdate
                | NotificationKind::AvailabilityUpdate
                | NotificationKind::SystemAlert
                | NotificationKind::CustomUpdate
        )
    }
}

/// Notification published on the [`Bus`](crate::Bus).
#[derive(Debug, Clone)]
pub enum Notification {
    /// Transport connected; reconnect counter reset, heartbeat started.
    Connected { at: DateTime<Utc> },

    /// Channel moved to `Disconnected` (explicit call).
    Disconnected { at: DateTime<Utc> },

    /// Reconnect budget exhausted; no further automatic attempts.
    ConnectionFailed {
        /// Failed attempts since the last manual `connect()`.
        attempts: u32,
        /// Last connection error message.
        reason: Arc<str>,
        at: DateTime<Utc>,
    },

    /// Another connect attempt was scheduled after a failure.
    ReconnectScheduled {
        /// Failed attempts so far.
        attempt: u32,
        /// Delay before the next attempt.
        delay: Duration,
        reason: Arc<str>,
        at: DateTime<Utc>,
    },

    /// Periodic liveness tick while connected.
    Heartbeat {
        /// 1-based tick number within the current connection.
        seq: u64,
        at: DateTime<Utc>,
    },

    /// Transport accepted the envelope; it is now being dispatched.
    UpdateSent(Arc<Envelope>),

    /// Transport rejected the envelope; it went back into the queue.
    DeliveryFailed {
        envelope_id: EnvelopeId,
        kind: UpdateKind,
        reason: Arc<str>,
    },

    JobStatusUpdate(JobStatusUpdate),
    PaymentStatusUpdate(PaymentStatusUpdate),
    LocationUpdate(LocationUpdate),
    AvailabilityUpdate(AvailabilityUpdate),
    SystemAlert(SystemAlert),

    /// Update of a non built-in kind; carries the full envelope.
    CustomUpdate(Arc<Envelope>),

    /// Subscribe/unsubscribe intent for a user or a job.
    Subscription(SubscriptionSignal),
}

impl Notification {
    /// Returns the classification of this notification.
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::Connected { .. } => NotificationKind::Connected,
            Notification::Disconnected { .. } => NotificationKind::Disconnected,
            Notification::ConnectionFailed { .. } => NotificationKind::ConnectionFailed,
            Notification::ReconnectScheduled { .. } => NotificationKind::ReconnectScheduled,
            Notification::Heartbeat { .. } => NotificationKind::Heartbeat,
            Notification::UpdateSent(_) => NotificationKind::UpdateSent,
            Notification::DeliveryFailed { .. } => NotificationKind::DeliveryFailed,
            Notification::JobStatusUpdate(_) => NotificationKind::JobStatusUpdate,
            Notification::PaymentStatusUpdate(_) => NotificationKind::PaymentStatusUpdate,
            Notification::LocationUpdate(_) => NotificationKind::LocationUpdate,
            Notification::AvailabilityUpdate(_) => NotificationKind::AvailabilityUpdate,
            Notification::SystemAlert(_) => NotificationKind::SystemAlert,
            Notification::CustomUpdate(_) => NotificationKind::CustomUpdate,
            Notification::Subscription(signal) => match (&signal.action, &signal.target) {
                (SubscriptionAction::Subscribe, SubscriptionTarget::User(_)) => {
                    NotificationKind::Subscribe
                }
                (SubscriptionAction::Unsubscribe, SubscriptionTarget::User(_)) => {
                    NotificationKind::Unsubscribe
                }
                (SubscriptionAction::Subscribe, SubscriptionTarget::Job(_)) => {
                    NotificationKind::SubscribeToJob
                }
                (SubscriptionAction::Unsubscribe, SubscriptionTarget::Job(_)) => {
                    NotificationKind::UnsubscribeFromJob
                }
            },
        }
    }

    #[inline]
    pub(crate) fn connected() -> Self {
        Notification::Connected { at: Utc::now() }
    }

    #[inline]
    pub(crate) fn disconnected() -> Self {
        Notification::Disconnected { at: Utc::now() }
    }

    #[inline]
    pub(crate) fn heartbeat(seq: u64) -> Self {
        Notification::Heartbeat { seq, at: Utc::now() }
    }

    pub(crate) fn connection_failed(attempts: u32, reason: impl Into<Arc<str>>) -> Self {
        Notification::ConnectionFailed {
            attempts,
            reason: reason.into(),
            at: Utc::now(),
        }
    }

    pub(crate) fn reconnect_scheduled(
        attempt: u32,
        delay: Duration,
        reason: impl Into<Arc<str>>,
    ) -> Self {
        Notification::ReconnectScheduled {
            attempt,
            delay,
            reason: reason.into(),
            at: Utc::now(),
        }
    }

    pub(crate) fn delivery_failed(envelope: &Envelope, reason: impl Into<Arc<str>>) -> Self {
        Notification::DeliveryFailed {
            envelope_id: envelope.id(),
            kind: envelope.kind().clone(),
            reason: reason.into(),
        }
    }
}
