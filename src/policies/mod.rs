//! Reconnection policies.
//!
//! This module groups the knobs that control **whether** the channel retries a
//! failed connect and **how long** it waits in between.
//!
//! ## Contents
//! - [`ReconnectPolicy`] attempt budget + delay schedule, producing a [`ReconnectDecision`]
//! - [`BackoffPolicy`]   delay schedule (first / factor / max + jitter)
//! - [`JitterPolicy`]    randomization to avoid reconnect storms
//!
//! ## Defaults
//! - `ReconnectPolicy::default()` → 5 attempts.
//! - `BackoffPolicy::default()` → fixed 5 s (factor 1.0), max 60 s, no jitter.

mod backoff;
mod jitter;
mod reconnect;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use reconnect::{ReconnectDecision, ReconnectPolicy};
