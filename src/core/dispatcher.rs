//! # Fan-out of received envelopes.
//!
//! Once the transport accepted an envelope it counts as received. The channel
//! publishes `updateSent`, then [`dispatch`] routes it to exactly one update
//! channel by payload kind:
//!
//! ```text
//! JobStatus      ─► jobStatusUpdate      (payload)
//! PaymentStatus  ─► paymentStatusUpdate  (payload)
//! Location       ─► locationUpdate       (payload)
//! Availability   ─► availabilityUpdate   (payload)
//! SystemAlert    ─► systemAlert          (payload)
//! Custom         ─► customUpdate         (full envelope)
//! ```
//!
//! No filtering and no transformation of the payload.

use std::sync::Arc;

use crate::events::{Bus, Notification};
use crate::updates::{Envelope, UpdatePayload};

/// Publishes `updateSent` followed by the type-specific notification.
pub(crate) fn on_received(bus: &Bus, envelope: &Arc<Envelope>) {
    bus.publish(Notification::UpdateSent(Arc::clone(envelope)));
    dispatch(bus, envelope);
}

/// Routes one envelope to its update channel.
pub(crate) fn dispatch(bus: &Bus, envelope: &Arc<Envelope>) {
    let n = match envelope.payload() {
        UpdatePayload::JobStatus(u) => Notification::JobStatusUpdate(u.clone()),
        UpdatePayload::PaymentStatus(u) => Notification::PaymentStatusUpdate(u.clone()),
        UpdatePayload::Location(u) => Notification::LocationUpdate(u.clone()),
        UpdatePayload::Availability(u) => Notification::AvailabilityUpdate(u.clone()),
        UpdatePayload::SystemAlert(a) => Notification::SystemAlert(a.clone()),
        UpdatePayload::Custom(_) => Notification::CustomUpdate(Arc::clone(envelope)),
    };
    tracing::debug!(
        envelope_id = %envelope.id(),
        channel = n.kind().as_label(),
        "dispatching update"
    );
    bus.publish(n);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NotificationKind;
    use crate::updates::{LocationUpdate, PaymentStatus, PaymentStatusUpdate};
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn sent_then_exactly_one_typed_notification() {
        let bus = Bus::new(16, 16);
        let mut all = bus.subscribe();
        let mut locations = bus.location_updates();

        let fix = LocationUpdate {
            user_id: "eng-4".into(),
            latitude: 51.5,
            longitude: -0.12,
            accuracy: 8.0,
            timestamp: Utc::now(),
        };
        on_received(&bus, &Arc::new(Envelope::location(fix.clone())));

        assert_eq!(all.recv().await.unwrap().kind(), NotificationKind::UpdateSent);
        assert_eq!(all.recv().await.unwrap().kind(), NotificationKind::LocationUpdate);
        assert!(all.try_recv().is_err());
        assert_eq!(locations.recv().await.unwrap(), fix);
    }

    #[tokio::test]
    async fn custom_kinds_carry_the_envelope() {
        let bus = Bus::new(16, 16);
        let mut custom = bus.custom_updates();
        let mut payments = bus.payment_status_updates();

        let env = Arc::new(Envelope::custom("quote_ready", "c-1", json!({"q": 1}), None).unwrap());
        dispatch(&bus, &env);
        let got = custom.recv().await.unwrap();
        assert!(Arc::ptr_eq(&got, &env));

        let payment = PaymentStatusUpdate {
            payment_id: "p".into(),
            status: PaymentStatus::Refunded,
            amount: 10.0,
            currency: "EUR".into(),
            user_id: "c-1".into(),
            description: "refund".into(),
        };
        dispatch(&bus, &Arc::new(Envelope::payment_status(payment.clone())));
        assert_eq!(payments.recv().await.unwrap(), payment);
        assert!(custom.try_recv().is_err());
    }
}
