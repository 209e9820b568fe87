use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;

use super::{channel::UpdateChannel, config::ChannelConfig};
use crate::{
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
    transport::Transport,
};

/// Builder for an [`UpdateChannel`].
pub struct ChannelBuilder {
    cfg: ChannelConfig,
    transport: Arc<dyn Transport>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl ChannelBuilder {
    /// Creates a new builder with the given configuration and transport.
    pub fn new(cfg: ChannelConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            cfg,
            transport,
            subscribers: Vec::new(),
        }
    }

    /// Sets notification observers.
    ///
    /// Observers receive every notification the channel publishes, through
    /// dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the channel. It starts `Disconnected` with an empty queue.
    ///
    /// Must be called from within a tokio runtime when observers are attached.
    pub fn build(self) -> Arc<UpdateChannel> {
        let bus = Bus::new(self.cfg.bus_capacity.max(1), self.cfg.topic_capacity.max(1));

        if !self.subscribers.is_empty() {
            let subs = Arc::new(SubscriberSet::new(self.subscribers));
            subscriber_listener(&bus, subs);
        }

        Arc::new(UpdateChannel::new_internal(self.cfg, self.transport, bus))
    }
}

/// Forwards bus notifications to the observer set (fire-and-forget).
fn subscriber_listener(bus: &Bus, set: Arc<SubscriberSet>) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(n) => set.emit(n),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscriber listener lagged behind the bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConnectionError, DeliveryError};
    use crate::events::{Notification, NotificationKind};
    use crate::updates::Envelope;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct Loopback;

    #[async_trait]
    impl Transport for Loopback {
        async fn connect(&self) -> Result<(), ConnectionError> {
            Ok(())
        }
        async fn send(&self, _envelope: &Envelope) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<NotificationKind>>);

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_notification(&self, n: &Notification) {
            self.0.lock().unwrap().push(n.kind());
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn observers_see_lifecycle_notifications() {
        let recorder = Arc::new(Recorder::default());
        let ch = ChannelBuilder::new(ChannelConfig::default(), Arc::new(Loopback))
            .with_subscribers(vec![recorder.clone()])
            .build();

        ch.connect().await.unwrap();
        ch.disconnect().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![NotificationKind::Connected, NotificationKind::Disconnected]
        );
    }
}
