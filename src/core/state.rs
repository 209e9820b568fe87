//! Connection state, introspection types and the mutex-guarded channel state.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::config::ChannelConfig;
use super::queue::UpdateQueue;

/// Observable connection state.
///
/// The transient "connecting" phase of an attempt is not observable: the state
/// stays where it was until the attempt resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Initial state; also entered on explicit disconnect or when reconnects are exhausted.
    #[default]
    Disconnected,
    /// A connect attempt failed and another one is scheduled.
    Reconnecting,
    /// Transport connected; sends go out immediately and the heartbeat runs.
    Connected,
}

/// Snapshot returned by [`UpdateChannel::stats`](crate::UpdateChannel::stats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub is_connected: bool,
    pub queue_length: usize,
    pub reconnect_attempts: u32,
}

/// Everything the channel mutates, behind one lock.
pub(crate) struct State {
    pub(crate) cfg: ChannelConfig,
    pub(crate) connection: ConnectionState,
    /// A connect attempt of the current session is in flight.
    pub(crate) connecting: bool,
    /// Failed attempts since the last manual `connect()` or success.
    pub(crate) reconnect_attempts: u32,
    pub(crate) queue: UpdateQueue,
    /// Cancelled by `disconnect()`; parents heartbeat, reconnect and drain-retry timers.
    pub(crate) session: CancellationToken,
    /// Cancels only the running heartbeat loop.
    pub(crate) heartbeat: Option<CancellationToken>,
    /// Pending drain retry of the current session (child of `session`).
    pub(crate) drain_retry: Option<CancellationToken>,
}

impl State {
    pub(crate) fn new(cfg: ChannelConfig) -> Self {
        let session = CancellationToken::new();
        session.cancel();
        Self {
            cfg,
            connection: ConnectionState::Disconnected,
            connecting: false,
            reconnect_attempts: 0,
            queue: UpdateQueue::new(),
            session,
            heartbeat: None,
            drain_retry: None,
        }
    }

    #[inline]
    pub(crate) fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    pub(crate) fn stats(&self) -> ChannelStats {
        ChannelStats {
            is_connected: self.is_connected(),
            queue_length: self.queue.len(),
            reconnect_attempts: self.reconnect_attempts,
        }
    }

    pub(crate) fn stop_heartbeat(&mut self) {
        if let Some(token) = self.heartbeat.take() {
            token.cancel();
        }
    }
}
