//! # UpdateChannel: connection state machine, send path and drain loop.
//!
//! The [`UpdateChannel`] owns the transport handle, the notification bus, the
//! pending queue and the connection state. It is built once per process with
//! [`ChannelBuilder`](crate::ChannelBuilder) and shared as `Arc<UpdateChannel>`.
//!
//! ## Connection state machine
//! ```text
//!                 connect()                    ok
//! Disconnected ─────────────► [attempt] ─────────────────► Connected ──► heartbeat loop
//!      ▲                         │ err                        │             drain()
//!      │                         ▼                            │
//!      │            failures < max_attempts ─► Reconnecting   │ disconnect()
//!      │                         │   (sleep delay, attempt)   │
//!      │                         ▼                            │
//!      ├──── failures == max_attempts ─► ConnectionFailed     │
//!      └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Send path
//! ```text
//! send_*() ─► Envelope ─┬─ Connected ──► transport.send ─┬─ ok  ─► updateSent ─► dispatch
//!                       │                                └─ err ─► enqueue (tail) + drain retry
//!                       └─ otherwise ─► enqueue (tail)
//! ```
//!
//! ## Rules
//! - Queue delivery is FIFO; a failed head blocks everything behind it and the
//!   drain is retried after `drain_retry_delay`.
//! - An envelope sent while connected can overtake envelopes still stuck in the
//!   queue behind a failed head.
//! - A manual `connect()` resets the reconnect counter; scheduled attempts don't.
//! - `disconnect()` cancels the session: heartbeat, pending reconnect and pending
//!   drain retry all stop. The queue is kept.
//! - Producers never see delivery failures.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::builder::ChannelBuilder;
use super::config::ChannelConfig;
use super::delivery::{connect_once, send_once};
use super::dispatcher;
use super::heartbeat;
use super::queue::DrainGuard;
use super::state::{ChannelStats, ConnectionState, State};
use crate::error::ConnectionError;
use crate::events::{Bus, Notification};
use crate::policies::{ReconnectDecision, ReconnectPolicy};
use crate::transport::Transport;
use crate::updates::{Envelope, EnvelopeId};

/// Process-wide real-time update channel.
pub struct UpdateChannel {
    transport: Arc<dyn Transport>,
    bus: Bus,
    state: Mutex<State>,
    draining: AtomicBool,
}

impl UpdateChannel {
    /// Returns a builder for a channel over `transport`.
    pub fn builder(cfg: ChannelConfig, transport: Arc<dyn Transport>) -> ChannelBuilder {
        ChannelBuilder::new(cfg, transport)
    }

    pub(crate) fn new_internal(
        cfg: ChannelConfig,
        transport: Arc<dyn Transport>,
        bus: Bus,
    ) -> Self {
        Self {
            transport,
            bus,
            state: Mutex::new(State::new(cfg)),
            draining: AtomicBool::new(false),
        }
    }

    // ---- Lifecycle ----

    /// Attempts to connect the transport.
    ///
    /// On success the channel becomes `Connected`, the reconnect counter resets,
    /// the heartbeat starts, `connected` is published and the queue is drained
    /// before this call returns. On failure the reconnect policy takes over in
    /// the background and the error of this first attempt is returned.
    ///
    /// No-op (returns `Ok`) when already connected or while an attempt is in flight.
    pub async fn connect(self: &Arc<Self>) -> Result<(), ConnectionError> {
        let session = {
            let mut st = self.state.lock().await;
            if st.is_connected() || st.connecting {
                return Ok(());
            }
            st.session.cancel();
            st.session = CancellationToken::new();
            st.reconnect_attempts = 0;
            st.connecting = true;
            st.session.clone()
        };
        tracing::debug!(transport = self.transport.name(), "connecting");
        self.attempt_connect(session).await
    }

    /// Moves to `Disconnected` unconditionally and publishes `disconnected`.
    ///
    /// Stops the heartbeat and any scheduled reconnect or drain retry. Pending
    /// envelopes stay queued. Calling it while already disconnected changes nothing
    /// but the notification.
    pub async fn disconnect(&self) {
        let was_connected = {
            let mut st = self.state.lock().await;
            let was_connected = st.is_connected();
            st.session.cancel();
            st.stop_heartbeat();
            st.drain_retry = None;
            st.connection = ConnectionState::Disconnected;
            st.connecting = false;
            was_connected
        };
        if was_connected {
            self.transport.disconnect().await;
        }
        tracing::info!(transport = self.transport.name(), "disconnected");
        self.bus.publish(Notification::disconnected());
    }

    async fn attempt_connect(
        self: &Arc<Self>,
        session: CancellationToken,
    ) -> Result<(), ConnectionError> {
        let timeout = self.state.lock().await.cfg.connect_timeout();
        let res = connect_once(self.transport.as_ref(), timeout).await;

        let mut st = self.state.lock().await;
        if session.is_cancelled() {
            // disconnect() won the race; the session is gone
            return res;
        }
        st.connecting = false;

        match &res {
            Ok(()) => {
                st.connection = ConnectionState::Connected;
                st.reconnect_attempts = 0;
                self.start_heartbeat(&mut st);
                drop(st);

                tracing::info!(transport = self.transport.name(), "connected");
                self.bus.publish(Notification::connected());
                self.drain().await;
            }
            Err(e) => {
                st.reconnect_attempts = st.reconnect_attempts.saturating_add(1);
                let failures = st.reconnect_attempts;
                match st.cfg.reconnect.decide(failures) {
                    ReconnectDecision::Retry { delay } => {
                        st.connection = ConnectionState::Reconnecting;
                        drop(st);
                        tracing::info!(
                            attempt = failures,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "reconnect scheduled"
                        );
                        self.bus.publish(Notification::reconnect_scheduled(
                            failures,
                            delay,
                            e.as_message(),
                        ));
                        self.schedule_reconnect(session, delay);
                    }
                    ReconnectDecision::GiveUp => {
                        st.connection = ConnectionState::Disconnected;
                        drop(st);
                        tracing::error!(
                            attempts = failures,
                            error = e.as_label(),
                            "reconnect attempts exhausted"
                        );
                        self.bus
                            .publish(Notification::connection_failed(failures, e.as_message()));
                    }
                }
            }
        }
        res
    }

    /// Sleeps `delay` under the session, then runs one more attempt.
    fn schedule_reconnect(self: &Arc<Self>, session: CancellationToken, delay: Duration) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = session.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            {
                let mut st = this.state.lock().await;
                if session.is_cancelled() || st.connecting || st.is_connected() {
                    return;
                }
                st.connecting = true;
            }
            let _ = this.attempt_connect(session).await;
        });
    }

    fn start_heartbeat(&self, st: &mut State) {
        st.stop_heartbeat();
        if let Some(interval) = st.cfg.heartbeat_interval() {
            let token = st.session.child_token();
            heartbeat::spawn(self.bus.clone(), interval, token.clone());
            st.heartbeat = Some(token);
        }
    }

    // ---- Send path ----

    /// Delivers `envelope` now if connected, otherwise queues it.
    ///
    /// Resolves once the single transport call finished or the envelope was
    /// queued. Delivery failures are absorbed (re-queued and retried later).
    pub(crate) async fn submit(self: &Arc<Self>, envelope: Envelope) -> EnvelopeId {
        let envelope = Arc::new(envelope);
        let id = envelope.id();

        let timeout = {
            let mut st = self.state.lock().await;
            if !st.is_connected() {
                st.queue.enqueue(Arc::clone(&envelope));
                tracing::debug!(
                    envelope_id = %id,
                    kind = %envelope.kind(),
                    queue_length = st.queue.len(),
                    "queued while disconnected"
                );
                return id;
            }
            st.cfg.send_timeout()
        };

        match send_once(self.transport.as_ref(), &envelope, timeout).await {
            Ok(()) => dispatcher::on_received(&self.bus, &envelope),
            Err(e) => {
                self.bus
                    .publish(Notification::delivery_failed(&envelope, e.as_message()));
                let mut st = self.state.lock().await;
                st.queue.enqueue(envelope);
                self.schedule_drain_retry(&mut st);
            }
        }
        id
    }

    /// Delivers queued envelopes in order while connected.
    ///
    /// Stops at the first failure, leaving the failed envelope at the head, and
    /// schedules a retry after `drain_retry_delay`. Only one drain runs at a time.
    pub(crate) async fn drain(self: &Arc<Self>) {
        let Some(_guard) = DrainGuard::acquire(&self.draining) else {
            return;
        };

        let mut delivered = 0usize;
        loop {
            let (head, timeout) = {
                let st = self.state.lock().await;
                if !st.is_connected() {
                    break;
                }
                match st.queue.front() {
                    Some(head) => (head, st.cfg.send_timeout()),
                    None => break,
                }
            };

            match send_once(self.transport.as_ref(), &head, timeout).await {
                Ok(()) => {
                    self.state.lock().await.queue.complete_head(&head);
                    dispatcher::on_received(&self.bus, &head);
                    delivered += 1;
                }
                Err(e) => {
                    self.bus
                        .publish(Notification::delivery_failed(&head, e.as_message()));
                    self.schedule_drain_retry(&mut *self.state.lock().await);
                    break;
                }
            }
        }
        if delivered > 0 {
            tracing::debug!(delivered, "drain pass finished");
        }
    }

    /// Runs `drain()` again after `drain_retry_delay`.
    ///
    /// At most one retry is pending per session; its token is a child of the session.
    fn schedule_drain_retry(self: &Arc<Self>, st: &mut State) {
        if st.session.is_cancelled() {
            return;
        }
        if st.drain_retry.as_ref().is_some_and(|t| !t.is_cancelled()) {
            return;
        }
        let token = st.session.child_token();
        st.drain_retry = Some(token.clone());
        let delay = st.cfg.drain_retry_delay;

        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            {
                let mut st = this.state.lock().await;
                if token.is_cancelled() {
                    return;
                }
                st.drain_retry = None;
            }
            this.drain().await;
        });
    }

    // ---- Introspection ----

    /// True while the transport is connected.
    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.is_connected()
    }

    /// Current connection state.
    pub async fn state(&self) -> ConnectionState {
        self.state.lock().await.connection
    }

    /// `{ isConnected, queueLength, reconnectAttempts }`.
    pub async fn stats(&self) -> ChannelStats {
        self.state.lock().await.stats()
    }

    /// Number of envelopes waiting for delivery.
    pub async fn queue_len(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    /// Discards all queued envelopes without notifying producers.
    pub async fn clear_queue(&self) -> usize {
        let dropped = self.state.lock().await.queue.clear();
        if dropped > 0 {
            tracing::info!(dropped, "queue cleared");
        }
        dropped
    }

    /// Notification bus; subscribe here for typed update channels.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Snapshot of the current configuration.
    pub async fn config(&self) -> ChannelConfig {
        self.state.lock().await.cfg.clone()
    }

    // ---- Runtime configuration ----

    /// Sets how many failed attempts are allowed before `connectionFailed`.
    pub async fn set_max_reconnect_attempts(&self, max_attempts: u32) {
        self.state.lock().await.cfg.reconnect.max_attempts = max_attempts;
    }

    /// Sets the delay before the first scheduled reconnect (the whole interval
    /// for the default fixed schedule). Applies to attempts scheduled from now on.
    pub async fn set_reconnect_delay(&self, delay: Duration) {
        let mut st = self.state.lock().await;
        let backoff = &mut st.cfg.reconnect.backoff;
        backoff.first = delay;
        if backoff.max < delay {
            backoff.max = delay;
        }
    }

    /// Replaces the whole reconnect policy.
    pub async fn set_reconnect_policy(&self, policy: ReconnectPolicy) {
        self.state.lock().await.cfg.reconnect = policy;
    }

    /// Changes the heartbeat period; a running heartbeat is rebuilt immediately.
    /// `Duration::ZERO` disables it.
    pub async fn set_heartbeat_interval(&self, interval: Duration) {
        let mut st = self.state.lock().await;
        st.cfg.heartbeat_interval = interval;
        if st.is_connected() {
            self.start_heartbeat(&mut st);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use crate::events::NotificationKind;
    use crate::updates::{AlertSeverity, SystemAlert};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Transport whose connect/send outcomes are scripted; unscripted calls succeed.
    #[derive(Default)]
    struct Scripted {
        connects: std::sync::Mutex<VecDeque<bool>>,
        sends: std::sync::Mutex<VecDeque<bool>>,
        connect_calls: AtomicUsize,
        send_calls: AtomicUsize,
    }

    impl Scripted {
        fn with(connects: &[bool], sends: &[bool]) -> Arc<Self> {
            Arc::new(Self {
                connects: std::sync::Mutex::new(connects.iter().copied().collect()),
                sends: std::sync::Mutex::new(sends.iter().copied().collect()),
                ..Self::default()
            })
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn connect(&self) -> Result<(), ConnectionError> {
            self.connect_calls.fetch_add(1, Ordering::SeqCst);
            match self.connects.lock().unwrap().pop_front() {
                Some(false) => Err(ConnectionError::refused("scripted")),
                _ => Ok(()),
            }
        }

        async fn send(&self, _envelope: &Envelope) -> Result<(), DeliveryError> {
            self.send_calls.fetch_add(1, Ordering::SeqCst);
            match self.sends.lock().unwrap().pop_front() {
                Some(false) => Err(DeliveryError::rejected("scripted")),
                _ => Ok(()),
            }
        }
    }

    fn alert() -> SystemAlert {
        SystemAlert {
            title: "t".into(),
            message: "m".into(),
            severity: AlertSeverity::Info,
            action_required: false,
            action_url: None,
        }
    }

    fn build(transport: Arc<Scripted>) -> Arc<UpdateChannel> {
        let cfg = ChannelConfig {
            heartbeat_interval: Duration::ZERO,
            ..ChannelConfig::default()
        };
        UpdateChannel::builder(cfg, transport).build()
    }

    #[tokio::test(start_paused = true)]
    async fn connect_is_a_no_op_when_connected() {
        let transport = Scripted::with(&[], &[]);
        let ch = build(transport.clone());

        ch.connect().await.unwrap();
        ch.connect().await.unwrap();
        assert_eq!(transport.connect_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ch.state().await, ConnectionState::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_immediate_send_is_queued_and_retried() {
        let transport = Scripted::with(&[], &[false]);
        let ch = build(transport.clone());
        let mut all = ch.bus().subscribe();

        ch.connect().await.unwrap();
        ch.send_system_alert(alert(), None).await;
        assert_eq!(ch.queue_len().await, 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(ch.queue_len().await, 0);
        assert_eq!(transport.send_calls.load(Ordering::SeqCst), 2);

        let mut kinds = Vec::new();
        while let Ok(n) = all.try_recv() {
            kinds.push(n.kind());
        }
        assert_eq!(
            kinds,
            vec![
                NotificationKind::Connected,
                NotificationKind::DeliveryFailed,
                NotificationKind::UpdateSent,
                NotificationKind::SystemAlert,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn drain_retry_is_rearmed_after_reconnect() {
        let transport = Scripted::with(&[], &[false, false]);
        let ch = build(transport.clone());

        ch.connect().await.unwrap();
        ch.send_system_alert(alert(), None).await;
        ch.disconnect().await;
        // the previous session's retry is gone; this drain fails and must arm its own
        ch.connect().await.unwrap();
        assert_eq!(ch.queue_len().await, 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(ch.queue_len().await, 0);
        assert_eq!(transport.send_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_settings_apply_to_an_already_scheduled_cycle() {
        let transport = Scripted::with(&[false; 8], &[]);
        let ch = build(transport.clone());

        assert!(ch.connect().await.is_err());
        // next attempt is already due at t=5s with the default delay
        ch.set_max_reconnect_attempts(3).await;
        ch.set_reconnect_delay(Duration::from_secs(1)).await;

        tokio::time::sleep(Duration::from_millis(5500)).await;
        assert_eq!(transport.connect_calls.load(Ordering::SeqCst), 2);
        assert_eq!(ch.state().await, ConnectionState::Reconnecting);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(transport.connect_calls.load(Ordering::SeqCst), 3);
        assert_eq!(ch.state().await, ConnectionState::Disconnected);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.connect_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_connect_while_reconnecting_restarts_the_cycle() {
        let transport = Scripted::with(&[false; 8], &[]);
        let ch = build(transport.clone());

        assert!(ch.connect().await.is_err());
        tokio::time::sleep(Duration::from_millis(5500)).await;
        assert_eq!(ch.state().await, ConnectionState::Reconnecting);
        assert_eq!(ch.stats().await.reconnect_attempts, 2);

        // t=5.5s: resets the counter and replaces the attempt pending at t=10s
        assert!(ch.connect().await.is_err());
        assert_eq!(transport.connect_calls.load(Ordering::SeqCst), 3);
        assert_eq!(ch.stats().await.reconnect_attempts, 1);

        tokio::time::sleep(Duration::from_millis(4750)).await;
        assert_eq!(transport.connect_calls.load(Ordering::SeqCst), 3);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(transport.connect_calls.load(Ordering::SeqCst), 4);
        assert_eq!(ch.stats().await.reconnect_attempts, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_cancels_pending_reconnect() {
        let transport = Scripted::with(&[false, false, false], &[]);
        let ch = build(transport.clone());

        assert!(ch.connect().await.is_err());
        assert_eq!(ch.state().await, ConnectionState::Reconnecting);
        ch.disconnect().await;

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.connect_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ch.state().await, ConnectionState::Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_connect_after_exhaustion_gets_fresh_budget() {
        let transport = Scripted::with(&[false, false, false, false], &[]);
        let ch = build(transport.clone());
        ch.set_max_reconnect_attempts(2).await;
        ch.set_reconnect_delay(Duration::from_millis(100)).await;

        let _ = ch.connect().await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(transport.connect_calls.load(Ordering::SeqCst), 2);
        assert_eq!(ch.stats().await.reconnect_attempts, 2);

        let _ = ch.connect().await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(transport.connect_calls.load(Ordering::SeqCst), 4);

        ch.connect().await.unwrap();
        assert_eq!(ch.stats().await.reconnect_attempts, 0);
        assert!(ch.is_connected().await);
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeat_interval_change_rebuilds_timer() {
        let transport = Scripted::with(&[], &[]);
        let ch = UpdateChannel::builder(ChannelConfig::default(), transport).build();
        let mut all = ch.bus().subscribe();

        ch.connect().await.unwrap();
        ch.set_heartbeat_interval(Duration::from_secs(2)).await;
        tokio::time::sleep(Duration::from_secs(7)).await;

        let beats = std::iter::from_fn(|| all.try_recv().ok())
            .filter(|n| n.kind() == NotificationKind::Heartbeat)
            .count();
        assert_eq!(beats, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_queue_discards_pending() {
        let ch = build(Scripted::with(&[], &[]));
        ch.send_system_alert(alert(), None).await;
        ch.send_system_alert(alert(), Some("u1")).await;
        assert_eq!(ch.clear_queue().await, 2);
        assert_eq!(ch.queue_len().await, 0);
    }
}
