//! # Notification bus.
//!
//! [`Bus`] owns an aggregate [`tokio::sync::broadcast`] stream of every
//! [`Notification`] plus one typed [`Topic`] per payload-carrying channel, so a
//! consumer can either observe everything or receive e.g.
//! `Receiver<PaymentStatusUpdate>` without matching on the enum.
//!
//! ## Architecture
//! ```text
//! Publishers:                            Consumers:
//!   connection state machine ──┐          subscribe()              (all notifications)
//!   drain loop / send path   ──┼─► Bus ──► payment_status_updates() (typed topic)
//!   dispatcher               ──┤          job_status_updates()     (typed topic)
//!   subscription signaling   ──┘          ... one per update channel
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never awaits.
//! - **One notification per publish**: the typed topic (if any) and the aggregate
//!   stream each get exactly one copy.
//! - **No persistence**: notifications are lost if nobody is subscribed at publish time.
//! - **Lag handling**: slow receivers observe `RecvError::Lagged(n)` and skip `n` oldest items.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::notification::{Notification, SubscriptionSignal};
use super::topic::Topic;
use crate::updates::{
    AvailabilityUpdate, Envelope, JobStatusUpdate, LocationUpdate, PaymentStatusUpdate,
    SystemAlert,
};

/// Notification bus: aggregate stream plus typed per-channel topics.
///
/// Cheap to clone; all clones publish into the same channels.
#[derive(Clone, Debug)]
pub struct Bus {
    all: broadcast::Sender<Notification>,
    job_status: Topic<JobStatusUpdate>,
    payment_status: Topic<PaymentStatusUpdate>,
    location: Topic<LocationUpdate>,
    availability: Topic<AvailabilityUpdate>,
    system_alert: Topic<SystemAlert>,
    custom: Topic<Arc<Envelope>>,
    subscriptions: Topic<SubscriptionSignal>,
}

impl Bus {
    /// Creates a bus.
    ///
    /// - `capacity` sizes the aggregate stream;
    /// - `topic_capacity` sizes each typed topic.
    ///
    /// Both are clamped to a minimum of 1.
    pub fn new(capacity: usize, topic_capacity: usize) -> Self {
        let (all, _rx) = broadcast::channel(capacity.max(1));
        Self {
            all,
            job_status: Topic::new(topic_capacity),
            payment_status: Topic::new(topic_capacity),
            location: Topic::new(topic_capacity),
            availability: Topic::new(topic_capacity),
            system_alert: Topic::new(topic_capacity),
            custom: Topic::new(topic_capacity),
            subscriptions: Topic::new(topic_capacity),
        }
    }

    /// Publishes a notification to its typed topic (if it has one) and to the aggregate stream.
    pub fn publish(&self, n: Notification) {
        match &n {
            Notification::JobStatusUpdate(u) => self.job_status.publish(u.clone()),
            Notification::PaymentStatusUpdate(u) => self.payment_status.publish(u.clone()),
            Notification::LocationUpdate(u) => self.location.publish(u.clone()),
            Notification::AvailabilityUpdate(u) => self.availability.publish(u.clone()),
            Notification::SystemAlert(a) => self.system_alert.publish(a.clone()),
            Notification::CustomUpdate(env) => self.custom.publish(Arc::clone(env)),
            Notification::Subscription(s) => self.subscriptions.publish(s.clone()),
            _ => {}
        }
        let _ = self.all.send(n);
    }

    /// Receiver for every notification published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.all.subscribe()
    }

    /// `jobStatusUpdate` channel.
    pub fn job_status_updates(&self) -> broadcast::Receiver<JobStatusUpdate> {
        self.job_status.subscribe()
    }

    /// `paymentStatusUpdate` channel.
    pub fn payment_status_updates(&self) -> broadcast::Receiver<PaymentStatusUpdate> {
        self.payment_status.subscribe()
    }

    /// `locationUpdate` channel.
    pub fn location_updates(&self) -> broadcast::Receiver<LocationUpdate> {
        self.location.subscribe()
    }

    /// `availabilityUpdate` channel.
    pub fn availability_updates(&self) -> broadcast::Receiver<AvailabilityUpdate> {
        self.availability.subscribe()
    }

    /// `systemAlert` channel.
    pub fn system_alerts(&self) -> broadcast::Receiver<SystemAlert> {
        self.system_alert.subscribe()
    }

    /// `customUpdate` channel (full envelopes).
    pub fn custom_updates(&self) -> broadcast::Receiver<Arc<Envelope>> {
        self.custom.subscribe()
    }

    /// `subscribe` / `unsubscribe` / `subscribeToJob` / `unsubscribeFromJob` signals.
    pub fn subscription_signals(&self) -> broadcast::Receiver<SubscriptionSignal> {
        self.subscriptions.subscribe()
    }
}
