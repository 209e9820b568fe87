//! # Example: field_updates
//!
//! Demonstrates the update channel over a flaky in-memory transport:
//! updates sent while offline are queued, the first connect attempts fail and
//! the reconnect policy takes over, and once connected the queue drains in order
//! and every update reaches its typed channel.
//!
//! ## Flow
//! ```text
//! send_payment_status / send_job_status   (offline → queued)
//! connect() → Err("dns lookup failed")     publish(ReconnectScheduled{attempt=1})
//!   └─► sleep(500ms) → connect() → Ok      publish(Connected)
//!         └─► drain(): UpdateSent + PaymentStatusUpdate, UpdateSent + JobStatusUpdate
//! send_system_alert(Error)                 (connected → immediate, priority urgent)
//! subscribe_to_job("job-1042")             publish(Subscription)
//! disconnect()                             publish(Disconnected)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example field_updates --features logging
//! ```

use std::{
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use fieldlink::{
    AlertSeverity, BackoffPolicy, ChannelConfig, ConnectionError, DeliveryError, Envelope,
    JobStatus, JobStatusUpdate, LogWriter, PaymentStatus, PaymentStatusUpdate, ReconnectPolicy,
    Subscribe, SystemAlert, Transport, UpdateChannel,
};
use tracing_subscriber::EnvFilter;

/// Fails the first two connects, then prints every envelope as JSON.
#[derive(Default)]
struct FlakySocket {
    attempts: AtomicU32,
}

#[async_trait]
impl Transport for FlakySocket {
    fn name(&self) -> &str {
        "flaky-socket"
    }

    async fn connect(&self) -> Result<(), ConnectionError> {
        match self.attempts.fetch_add(1, Ordering::Relaxed) {
            0 | 1 => Err(ConnectionError::refused("dns lookup failed")),
            _ => Ok(()),
        }
    }

    async fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
        let wire =
            serde_json::to_string(envelope).map_err(|e| DeliveryError::rejected(e.to_string()))?;
        println!("[wire] {wire}");
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1. Short delays so the demo finishes quickly
    let cfg = ChannelConfig {
        reconnect: ReconnectPolicy {
            max_attempts: 5,
            backoff: BackoffPolicy::fixed(Duration::from_millis(500)),
        },
        heartbeat_interval: Duration::from_secs(1),
        ..ChannelConfig::default()
    };

    // 2. Attach the built-in logger as an observer
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let channel = UpdateChannel::builder(cfg, Arc::new(FlakySocket::default()))
        .with_subscribers(subs)
        .build();

    // 3. Consumers subscribe to the typed channels they care about
    let mut payments = channel.bus().payment_status_updates();
    let mut jobs = channel.bus().job_status_updates();

    // 4. Offline sends are queued
    channel
        .send_payment_status(PaymentStatusUpdate {
            payment_id: "pay-311".into(),
            status: PaymentStatus::Failed,
            amount: 129.99,
            currency: "GBP".into(),
            user_id: "client-17".into(),
            description: "Annual boiler service".into(),
        })
        .await;
    channel
        .send_job_status(JobStatusUpdate {
            job_id: "job-1042".into(),
            status: JobStatus::Accepted,
            engineer_id: Some("eng-3".into()),
            engineer_name: Some("Sam Okafor".into()),
            client_id: "client-17".into(),
            client_name: "Priya Shah".into(),
            message: Some("On the way".into()),
        })
        .await;
    println!("queued: {:?}", channel.stats().await);

    // 5. First attempt fails; the reconnect policy keeps trying in the background
    if let Err(e) = channel.connect().await {
        println!("connect failed: {e}; retrying in the background");
    }

    let payment = payments.recv().await?;
    println!("payment {} is now {:?}", payment.payment_id, payment.status);
    let job = jobs.recv().await?;
    println!("job {} is now {:?}", job.job_id, job.status);

    // 6. Connected sends go out immediately
    channel
        .send_system_alert(
            SystemAlert {
                title: "Payment failed".into(),
                message: "Card declined for pay-311".into(),
                severity: AlertSeverity::Error,
                action_required: true,
                action_url: Some("/payments/pay-311".into()),
            },
            Some("client-17"),
        )
        .await;
    channel.subscribe_to_job("job-1042");

    // 7. Let a couple of heartbeats through, then shut down
    tokio::time::sleep(Duration::from_millis(2500)).await;
    channel.disconnect().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    println!("final: {:?}", channel.stats().await);
    Ok(())
}
