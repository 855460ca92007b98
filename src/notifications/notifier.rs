//! Event bus backed notification sender and its delivery log

use async_trait::async_trait;
use tracing::info;

use super::event_bus::SharedEventBus;
use super::events::Event;
use crate::application::ports::{NotificationError, NotificationSender};
use crate::shared::ShutdownSignal;

/// Publishes notifications to the in-process event bus.
#[derive(Clone)]
pub struct EventBusNotifier {
    bus: SharedEventBus,
}

impl EventBusNotifier {
    pub fn new(bus: SharedEventBus) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl NotificationSender for EventBusNotifier {
    async fn send(&self, event: Event) -> Result<(), NotificationError> {
        if self.bus.publish(event) == 0 {
            return Err(NotificationError::NoReceivers);
        }
        Ok(())
    }
}

/// Record every published event until shutdown.
pub fn spawn_delivery_logger(
    bus: SharedEventBus,
    shutdown: ShutdownSignal,
) -> tokio::task::JoinHandle<()> {
    let mut subscriber = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.wait() => break,
                message = subscriber.recv() => {
                    let Some(message) = message else { break };
                    let payload = serde_json::to_string(&message.event).unwrap_or_default();
                    info!(
                        event_id = %message.id,
                        event_type = message.event.event_type(),
                        user_id = message.event.user_id(),
                        payload = %payload,
                        "Notification delivered"
                    );
                }
            }
        }
        info!("Delivery logger stopped");
    })
}
