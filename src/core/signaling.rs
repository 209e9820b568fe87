//! Subscription intents.
//!
//! The channel keeps no membership table. Each call publishes one
//! [`SubscriptionSignal`] for an external transport layer to turn into a
//! server-side subscription request.

use crate::events::{Notification, SubscriptionAction, SubscriptionSignal, SubscriptionTarget};

use super::channel::UpdateChannel;

impl UpdateChannel {
    /// Publishes `subscribe` for `user_id`.
    pub fn subscribe_to_user(&self, user_id: impl Into<String>) {
        self.signal(SubscriptionAction::Subscribe, SubscriptionTarget::User(user_id.into()));
    }

    /// Publishes `unsubscribe` for `user_id`.
    pub fn unsubscribe_from_user(&self, user_id: impl Into<String>) {
        self.signal(SubscriptionAction::Unsubscribe, SubscriptionTarget::User(user_id.into()));
    }

    /// Publishes `subscribeToJob` for `job_id`.
    pub fn subscribe_to_job(&self, job_id: impl Into<String>) {
        self.signal(SubscriptionAction::Subscribe, SubscriptionTarget::Job(job_id.into()));
    }

    /// Publishes `unsubscribeFromJob` for `job_id`.
    pub fn unsubscribe_from_job(&self, job_id: impl Into<String>) {
        self.signal(SubscriptionAction::Unsubscribe, SubscriptionTarget::Job(job_id.into()));
    }

    fn signal(&self, action: SubscriptionAction, target: SubscriptionTarget) {
        tracing::debug!(?action, id = target.id(), "subscription intent");
        self.bus()
            .publish(Notification::Subscription(SubscriptionSignal::new(action, target)));
    }
}
