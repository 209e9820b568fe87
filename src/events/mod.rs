//! Channel notifications: types and broadcast bus.
//!
//! This module groups the notification **data model** and the **bus** used to
//! publish/subscribe to everything the update channel emits.
//!
//! ## Contents
//! - [`Notification`], [`NotificationKind`] classification and payloads
//! - [`SubscriptionSignal`] and friends, the intent records for an external transport
//! - [`Bus`] aggregate broadcast stream plus typed per-channel [`Topic`]s
//!
//! ## Quick reference
//! - **Publishers**: connection state machine, heartbeat loop, send path,
//!   drain loop, dispatcher, subscription signaling.
//! - **Consumers**: application code via `Bus` receivers, and observers attached
//!   with [`ChannelBuilder::with_subscribers`](crate::ChannelBuilder::with_subscribers).

mod bus;
mod notification;
mod topic;

pub use bus::Bus;
pub use notification::{
    Notification, NotificationKind, SubscriptionAction, SubscriptionSignal, SubscriptionTarget,
};
pub use topic::Topic;
