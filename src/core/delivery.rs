//! # One transport attempt, with optional timeout.
//!
//! - **Execute ONE attempt** of `Transport::connect` or `Transport::send`
//! - **Apply timeout** if configured (wraps the call in `tokio::time::timeout`)
//! - **Map elapsed** to `ConnectionError::Timeout` / `DeliveryError::Timeout`
//!
//! Callers decide what a failure means (reconnect policy, re-queue); this
//! module only runs the attempt and logs its outcome.

use std::time::Duration;

use tokio::time;

use crate::error::{ConnectionError, DeliveryError};
use crate::transport::Transport;
use crate::updates::Envelope;

/// Runs a single connect attempt.
pub(crate) async fn connect_once(
    transport: &dyn Transport,
    timeout: Option<Duration>,
) -> Result<(), ConnectionError> {
    let res = match timeout {
        Some(dur) => match time::timeout(dur, transport.connect()).await {
            Ok(r) => r,
            Err(_elapsed) => Err(ConnectionError::Timeout { timeout: dur }),
        },
        None => transport.connect().await,
    };

    if let Err(e) = &res {
        tracing::warn!(
            transport = transport.name(),
            error = e.as_label(),
            detail = %e.as_message(),
            "connect attempt failed"
        );
    }
    res
}

/// Hands one envelope to the transport.
pub(crate) async fn send_once(
    transport: &dyn Transport,
    envelope: &Envelope,
    timeout: Option<Duration>,
) -> Result<(), DeliveryError> {
    let res = match timeout {
        Some(dur) => match time::timeout(dur, transport.send(envelope)).await {
            Ok(r) => r,
            Err(_elapsed) => Err(DeliveryError::Timeout { timeout: dur }),
        },
        None => transport.send(envelope).await,
    };

    match &res {
        Ok(()) => tracing::debug!(
            transport = transport.name(),
            envelope_id = %envelope.id(),
            kind = %envelope.kind(),
            priority = envelope.priority().as_str(),
            "envelope delivered"
        ),
        Err(e) => tracing::warn!(
            transport = transport.name(),
            envelope_id = %envelope.id(),
            kind = %envelope.kind(),
            error = e.as_label(),
            detail = %e.as_message(),
            "envelope delivery failed"
        ),
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct Stalled;

    #[async_trait]
    impl Transport for Stalled {
        async fn connect(&self) -> Result<(), ConnectionError> {
            std::future::pending().await
        }
        async fn send(&self, _envelope: &Envelope) -> Result<(), DeliveryError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeouts_are_reported_as_failures() {
        let limit = Duration::from_millis(250);
        assert_eq!(
            connect_once(&Stalled, Some(limit)).await,
            Err(ConnectionError::Timeout { timeout: limit })
        );

        let env = Envelope::custom("ping", "u1", json!(null), None).unwrap();
        assert_eq!(
            send_once(&Stalled, &env, Some(limit)).await,
            Err(DeliveryError::Timeout { timeout: limit })
        );
    }
}
