//! # Transport abstraction.
//!
//! The channel never talks to a network itself. A [`Transport`] supplies the two
//! operations it needs: attempt a connection and attempt to move one envelope.
//! Socket clients, long-poll clients and test fakes all plug in here.
//!
//! ## Contract
//! - `connect()` resolves to `Ok(())` once the transport can accept sends.
//! - `send()` resolves to `Ok(())` once the envelope has left this process;
//!   the channel then treats it as received and dispatches it locally.
//! - Both calls may be wrapped in a timeout by the channel
//!   ([`ChannelConfig::connect_timeout`](crate::ChannelConfig::connect_timeout),
//!   [`ChannelConfig::send_timeout`](crate::ChannelConfig::send_timeout));
//!   implementations should be cancel-safe.
//! - `send()` is never called concurrently for the same queued envelope, but
//!   immediate sends and the drain loop may overlap.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use fieldlink::{ConnectionError, DeliveryError, Envelope, Transport};
//!
//! struct Loopback;
//!
//! #[async_trait]
//! impl Transport for Loopback {
//!     fn name(&self) -> &str { "loopback" }
//!
//!     async fn connect(&self) -> Result<(), ConnectionError> { Ok(()) }
//!
//!     async fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
//!         let _wire = serde_json::to_string(envelope)
//!             .map_err(|e| DeliveryError::rejected(e.to_string()))?;
//!         Ok(())
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::{ConnectionError, DeliveryError};
use crate::updates::Envelope;

/// Connection-oriented carrier for envelopes.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Human-readable name for logs.
    fn name(&self) -> &str {
        "transport"
    }

    /// Attempts to establish the connection.
    async fn connect(&self) -> Result<(), ConnectionError>;

    /// Attempts to deliver one envelope.
    async fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError>;

    /// Releases the connection. Called on explicit disconnect; default does nothing.
    async fn disconnect(&self) {}
}
