//! # Notification observers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out that drives observers attached to the channel at build time.
//!
//! ## Architecture
//! ```text
//! UpdateChannel ── publish(Notification) ──► Bus ──► listener ──► SubscriberSet
//!                                                                   ├──► LogWriter
//!                                                                   ├──► Metrics
//!                                                                   └──► Custom ...
//! ```
//!
//! Application code that only needs one channel should subscribe to the typed
//! topics on [`Bus`](crate::Bus) instead.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
