//! Typed senders: one per update kind, plus a custom and a raw envelope sender.
//!
//! Each wraps its payload with [`Envelope`]'s constructor (which picks the
//! target user and the priority) and hands it to the send path. All of them
//! return once the single transport call resolved or the envelope was queued.

use std::sync::Arc;

use super::channel::UpdateChannel;
use crate::error::UpdateError;
use crate::updates::{
    AvailabilityUpdate, Envelope, EnvelopeId, JobStatusUpdate, LocationUpdate,
    PaymentStatusUpdate, Priority, SystemAlert,
};

impl UpdateChannel {
    /// Sends a job status change to the job's client.
    pub async fn send_job_status(self: &Arc<Self>, update: JobStatusUpdate) -> EnvelopeId {
        self.submit(Envelope::job_status(update)).await
    }

    /// Sends a payment status change to the payment's user.
    pub async fn send_payment_status(self: &Arc<Self>, update: PaymentStatusUpdate) -> EnvelopeId {
        self.submit(Envelope::payment_status(update)).await
    }

    /// Sends a location fix for the reporting user.
    pub async fn send_location(self: &Arc<Self>, update: LocationUpdate) -> EnvelopeId {
        self.submit(Envelope::location(update)).await
    }

    /// Sends an engineer availability change.
    pub async fn send_availability(self: &Arc<Self>, update: AvailabilityUpdate) -> EnvelopeId {
        self.submit(Envelope::availability(update)).await
    }

    /// Sends an alert to `target`, or to every user (`"system"`) when `None`.
    pub async fn send_system_alert(
        self: &Arc<Self>,
        alert: SystemAlert,
        target: Option<&str>,
    ) -> EnvelopeId {
        self.submit(Envelope::system_alert(alert, target)).await
    }

    /// Sends an arbitrary JSON payload under a custom kind.
    ///
    /// Received custom updates surface on the `customUpdate` channel with the
    /// full envelope. Priority defaults to `normal`.
    pub async fn send_custom(
        self: &Arc<Self>,
        kind: impl AsRef<str>,
        user_id: impl Into<String>,
        payload: serde_json::Value,
        priority: Option<Priority>,
    ) -> Result<EnvelopeId, UpdateError> {
        let envelope = Envelope::custom(kind, user_id, payload, priority)?;
        Ok(self.submit(envelope).await)
    }

    /// Sends a prebuilt envelope.
    pub async fn send(self: &Arc<Self>, envelope: Envelope) -> EnvelopeId {
        self.submit(envelope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChannelConfig;
    use crate::error::{ConnectionError, DeliveryError};
    use crate::transport::Transport;
    use crate::updates::{JobStatus, UpdateKind};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Vec<(UpdateKind, String, Priority)>>);

    #[async_trait]
    impl Transport for Capture {
        async fn connect(&self) -> Result<(), ConnectionError> {
            Ok(())
        }
        async fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
            self.0.lock().unwrap().push((
                envelope.kind().clone(),
                envelope.user_id().to_string(),
                envelope.priority(),
            ));
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn senders_pick_target_and_priority() {
        let transport = Arc::new(Capture::default());
        let ch = UpdateChannel::builder(ChannelConfig::default(), transport.clone()).build();
        ch.connect().await.unwrap();

        ch.send_job_status(JobStatusUpdate {
            job_id: "job-1".into(),
            status: JobStatus::Accepted,
            engineer_id: Some("eng-1".into()),
            engineer_name: None,
            client_id: "client-9".into(),
            client_name: "Ada".into(),
            message: None,
        })
        .await;
        ch.send_custom("quote_ready", "client-9", json!({"total": 120}), Some(Priority::Low))
            .await
            .unwrap();

        let sent = transport.0.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![
                (UpdateKind::JobStatus, "client-9".to_string(), Priority::High),
                (
                    UpdateKind::custom("quote_ready").unwrap(),
                    "client-9".to_string(),
                    Priority::Low
                ),
            ]
        );
    }

    #[tokio::test]
    async fn invalid_custom_kind_is_rejected_before_sending() {
        let transport = Arc::new(Capture::default());
        let ch = UpdateChannel::builder(ChannelConfig::default(), transport.clone()).build();

        let err = ch
            .send_custom("job_status", "u1", json!({}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, UpdateError::ReservedKind { .. }));

        let err = ch
            .send_custom("quote_ready", "u1", json!({}), Some(Priority::Urgent))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            UpdateError::ReservedPriority {
                priority: Priority::Urgent
            }
        );
        assert_eq!(ch.queue_len().await, 0);
    }
}
