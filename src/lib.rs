//! # fieldlink
//!
//! **Fieldlink** is the client-side real-time update layer of a field-service
//! app: one process-wide channel that accepts typed updates (job status,
//! payment status, location, availability, system alerts, custom events),
//! delivers them through a pluggable [`Transport`] when connected, buffers them
//! in order when not, and fans received updates out to local consumers.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   send_job_status  send_payment_status  send_location  ...  send_custom
//!          │                 │                  │                  │
//!          ▼                 ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  UpdateChannel                                                    │
//! │  - connection state machine (connect / reconnect / disconnect)    │
//! │  - UpdateQueue (FIFO of pending envelopes, head-of-line retry)    │
//! │  - heartbeat loop (while connected)                               │
//! └──────┬───────────────────────────────────────────────────┬────────┘
//!        │ connect / send                                    │ publish
//!        ▼                                                   ▼
//! ┌──────────────┐                      ┌────────────────────────────────┐
//! │  Transport   │                      │  Bus                           │
//! │ (user impl)  │                      │  - aggregate stream            │
//! └──────────────┘                      │  - typed topics per update     │
//!                                       └───────┬──────────────┬─────────┘
//!                                               ▼              ▼
//!                                      app receivers      SubscriberSet
//!                                   (job_status_updates,  (per-observer
//!                                    system_alerts, ...)   queues/workers)
//! ```
//!
//! ### Delivery
//! ```text
//! send_*() ─► Envelope ─► connected? ── yes ─► transport.send ── ok ─► updateSent ─► typed channel
//!                            │                       └── err ─► queue tail + drain retry
//!                            └─ no ─► queue tail
//!
//! connected ─► drain(): head ─► transport.send ── ok ─► pop, updateSent, typed channel, next
//!                                      └── err ─► keep head, retry after drain_retry_delay
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                         |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Channel**       | Connection lifecycle, typed senders, queue introspection.    | [`UpdateChannel`], [`ChannelBuilder`]      |
//! | **Updates**       | Envelope and payload model.                                  | [`Envelope`], [`UpdateKind`], [`Priority`] |
//! | **Notifications** | Aggregate and typed broadcast channels.                      | [`Bus`], [`Notification`]                  |
//! | **Observers**     | Hook into every notification (logging, metrics, custom).     | [`Subscribe`], [`SubscriberSet`]           |
//! | **Policies**      | Reconnect bound and delay schedule.                          | [`ReconnectPolicy`], [`BackoffPolicy`]     |
//! | **Transport**     | The seam to the real network.                                | [`Transport`]                              |
//! | **Errors**        | Typed connect, delivery and validation errors.               | [`ConnectionError`], [`DeliveryError`]     |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] observer that renders
//!   notifications through `tracing` _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use fieldlink::{
//!     AlertSeverity, ChannelConfig, ConnectionError, DeliveryError, Envelope, SystemAlert,
//!     Transport, UpdateChannel,
//! };
//!
//! struct Loopback;
//!
//! #[async_trait]
//! impl Transport for Loopback {
//!     async fn connect(&self) -> Result<(), ConnectionError> { Ok(()) }
//!     async fn send(&self, _envelope: &Envelope) -> Result<(), DeliveryError> { Ok(()) }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let channel = UpdateChannel::builder(ChannelConfig::default(), Arc::new(Loopback)).build();
//!     let mut alerts = channel.bus().system_alerts();
//!
//!     // Queued while disconnected, delivered by connect().
//!     channel
//!         .send_system_alert(
//!             SystemAlert {
//!                 title: "Maintenance".into(),
//!                 message: "Payments are paused for 10 minutes".into(),
//!                 severity: AlertSeverity::Warning,
//!                 action_required: false,
//!                 action_url: None,
//!             },
//!             None,
//!         )
//!         .await;
//!     assert_eq!(channel.queue_len().await, 1);
//!
//!     channel.connect().await?;
//!     assert_eq!(alerts.recv().await?.title, "Maintenance");
//!     assert_eq!(channel.queue_len().await, 0);
//!
//!     channel.disconnect().await;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod transport;
mod updates;

// ---- Public re-exports ----

pub use self::core::{ChannelBuilder, ChannelConfig, ChannelStats, ConnectionState, UpdateChannel};
pub use error::{ConnectionError, DeliveryError, UpdateError};
pub use events::{
    Bus, Notification, NotificationKind, SubscriptionAction, SubscriptionSignal,
    SubscriptionTarget, Topic,
};
pub use policies::{BackoffPolicy, JitterPolicy, ReconnectDecision, ReconnectPolicy};
pub use subscribers::{Subscribe, SubscriberSet};
pub use transport::Transport;
pub use updates::{
    AlertSeverity, AvailabilityUpdate, Envelope, EnvelopeId, JobStatus, JobStatusUpdate,
    LocationUpdate, PaymentStatus, PaymentStatusUpdate, Priority, SYSTEM_USER, SystemAlert,
    UpdateKind, UpdatePayload,
};

// Optional: expose a simple built-in logger observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
