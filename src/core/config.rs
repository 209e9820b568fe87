//! # Channel configuration.
//!
//! Provides [`ChannelConfig`], the settings consumed by
//! [`ChannelBuilder`](crate::ChannelBuilder). Reconnect budget, reconnect delay
//! and heartbeat interval can also be changed at runtime through the setters on
//! [`UpdateChannel`](crate::UpdateChannel).
//!
//! ## Sentinel values
//! - `connect_timeout = 0s` → no timeout around `Transport::connect`
//! - `send_timeout = 0s` → no timeout around `Transport::send`
//! - `heartbeat_interval = 0s` → heartbeat disabled

use std::time::Duration;

use crate::policies::ReconnectPolicy;

/// Configuration for an [`UpdateChannel`](crate::UpdateChannel).
///
/// ## Field semantics
/// - `reconnect`: attempt budget and delay schedule after connect failures
/// - `heartbeat_interval`: period of the `heartbeat` notification while connected
/// - `drain_retry_delay`: wait before draining again after a delivery failure
/// - `connect_timeout` / `send_timeout`: per-attempt limits (`0s` = none)
/// - `bus_capacity`: aggregate notification stream ring buffer (min 1)
/// - `topic_capacity`: ring buffer of each typed topic (min 1)
#[derive(Clone, Debug)]
pub struct ChannelConfig {
    /// Reconnection policy (default: 5 attempts, fixed 5 s apart).
    pub reconnect: ReconnectPolicy,

    /// Heartbeat period while connected (default: 30 s).
    pub heartbeat_interval: Duration,

    /// Delay before a stalled drain is retried (default: 1 s).
    ///
    /// A failed head-of-queue delivery stops the drain; it is resumed after this
    /// delay instead of spinning.
    pub drain_retry_delay: Duration,

    /// Timeout around each connect attempt. A timeout counts as a failed attempt.
    pub connect_timeout: Duration,

    /// Timeout around each send attempt. A timeout counts as a failed delivery.
    pub send_timeout: Duration,

    /// Capacity of the aggregate notification stream.
    pub bus_capacity: usize,

    /// Capacity of each typed topic.
    pub topic_capacity: usize,
}

impl ChannelConfig {
    /// Connect timeout as an `Option` (`None` = unbounded).
    #[inline]
    pub fn connect_timeout(&self) -> Option<Duration> {
        non_zero(self.connect_timeout)
    }

    /// Send timeout as an `Option` (`None` = unbounded).
    #[inline]
    pub fn send_timeout(&self) -> Option<Duration> {
        non_zero(self.send_timeout)
    }

    /// Heartbeat interval as an `Option` (`None` = disabled).
    #[inline]
    pub fn heartbeat_interval(&self) -> Option<Duration> {
        non_zero(self.heartbeat_interval)
    }
}

#[inline]
fn non_zero(d: Duration) -> Option<Duration> {
    if d == Duration::ZERO { None } else { Some(d) }
}

impl Default for ChannelConfig {
    /// Default configuration:
    ///
    /// - `reconnect = ReconnectPolicy::default()` (5 attempts, 5 s apart)
    /// - `heartbeat_interval = 30s`
    /// - `drain_retry_delay = 1s`
    /// - `connect_timeout = 0s`, `send_timeout = 0s` (no timeout)
    /// - `bus_capacity = 1024`, `topic_capacity = 256`
    fn default() -> Self {
        Self {
            reconnect: ReconnectPolicy::default(),
            heartbeat_interval: Duration::from_secs(30),
            drain_retry_delay: Duration::from_secs(1),
            connect_timeout: Duration::ZERO,
            send_timeout: Duration::ZERO,
            bus_capacity: 1024,
            topic_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ChannelConfig::default();
        assert_eq!(cfg.reconnect.max_attempts, 5);
        assert_eq!(cfg.reconnect.backoff.delay_after(1), Duration::from_secs(5));
        assert_eq!(cfg.heartbeat_interval(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.drain_retry_delay, Duration::from_secs(1));
        assert_eq!(cfg.connect_timeout(), None);
        assert_eq!(cfg.send_timeout(), None);
    }

    #[test]
    fn zero_heartbeat_disables_it() {
        let cfg = ChannelConfig {
            heartbeat_interval: Duration::ZERO,
            ..ChannelConfig::default()
        };
        assert_eq!(cfg.heartbeat_interval(), None);
    }
}
