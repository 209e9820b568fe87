//! # LogWriter: notification logger
//!
//! A minimal observer that renders every [`Notification`] as a `tracing` event
//! under the `fieldlink::notifications` target. Install any `tracing`
//! subscriber to see the output.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO  connected
//! DEBUG heartbeat seq=1
//! WARN  delivery failed envelope_id=0190... kind=payment_status reason="rejected: 503"
//! INFO  reconnect scheduled attempt=1 delay_ms=5000
//! ERROR connection failed attempts=5 reason="refused: dns"
//! INFO  update dispatched channel="paymentStatusUpdate"
//! ```

use async_trait::async_trait;

use crate::events::Notification;
use crate::subscribers::Subscribe;

const TARGET: &str = "fieldlink::notifications";

/// Notification logger.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_notification(&self, n: &Notification) {
        match n {
            Notification::Connected { .. } => tracing::info!(target: TARGET, "connected"),
            Notification::Disconnected { .. } => tracing::info!(target: TARGET, "disconnected"),
            Notification::ConnectionFailed {
                attempts, reason, ..
            } => {
                tracing::error!(target: TARGET, attempts, reason = %reason, "connection failed");
            }
            Notification::ReconnectScheduled {
                attempt,
                delay,
                reason,
                ..
            } => {
                tracing::info!(
                    target: TARGET,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    reason = %reason,
                    "reconnect scheduled"
                );
            }
            Notification::Heartbeat { seq, .. } => {
                tracing::debug!(target: TARGET, seq, "heartbeat");
            }
            Notification::UpdateSent(env) => {
                tracing::debug!(
                    target: TARGET,
                    envelope_id = %env.id(),
                    kind = %env.kind(),
                    user_id = env.user_id(),
                    "update sent"
                );
            }
            Notification::DeliveryFailed {
                envelope_id,
                kind,
                reason,
            } => {
                tracing::warn!(
                    target: TARGET,
                    envelope_id = %envelope_id,
                    kind = %kind,
                    reason = %reason,
                    "delivery failed"
                );
            }
            Notification::Subscription(signal) => {
                tracing::info!(
                    target: TARGET,
                    channel = n.kind().as_label(),
                    id = signal.target.id(),
                    "subscription intent"
                );
            }
            _ => {
                tracing::info!(target: TARGET, channel = n.kind().as_label(), "update dispatched");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
