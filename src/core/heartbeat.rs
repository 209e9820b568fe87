//! # Heartbeat loop.
//!
//! While connected, publishes one `heartbeat` notification per interval. The
//! first tick fires one full interval after the loop starts. The loop ends when
//! its token is cancelled (disconnect, or interval reconfigured).

use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Notification};

/// Spawns the heartbeat loop under `token`.
pub(crate) fn spawn(bus: Bus, interval: Duration, token: CancellationToken) {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut seq: u64 = 0;

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    seq += 1;
                    bus.publish(Notification::heartbeat(seq));
                }
            }
        }
        tracing::debug!(ticks = seq, "heartbeat stopped");
    });
}
