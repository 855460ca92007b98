//! In-process broadcast bus for scheduling notifications
//!
//! Every subscriber sees every event unless it narrows itself to one user.
//! Slow subscribers skip what they missed instead of blocking publishers.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::broadcast;

use super::events::{Event, EventMessage};

const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns how many subscribers the event reached.
    pub fn publish(&self, event: Event) -> usize {
        let message = EventMessage::new(event);
        let event_type = message.event.event_type();
        let user_id = message.event.user_id();

        let reached = self.sender.send(message).unwrap_or(0);
        debug!(
            "Published {} for user {} to {} subscriber(s)",
            event_type, user_id, reached
        );
        reached
    }

    /// Subscribe to every event.
    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber {
            receiver: self.sender.subscribe(),
            user_id: None,
        }
    }

    /// Subscribe to the events addressed to one user.
    pub fn subscribe_user(&self, user_id: i32) -> EventSubscriber {
        EventSubscriber {
            receiver: self.sender.subscribe(),
            user_id: Some(user_id),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    user_id: Option<i32>,
}

impl EventSubscriber {
    /// Next matching event; `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => {
                    if self.user_id.map_or(true, |id| message.event.user_id() == id) {
                        return Some(message);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Notification subscriber lagged, {} events skipped", missed);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::*;
    use crate::notifications::events::ReservationCreatedEvent;

    fn booked_by(professional_id: i32) -> Event {
        Event::ReservationCreated(ReservationCreatedEvent {
            reservation_id: 1,
            room_id: 1,
            professional_id,
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            start_time: "09:00".into(),
            end_time: "10:00".into(),
        })
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();

        assert_eq!(bus.publish(booked_by(2)), 1);

        let received = tokio::time::timeout(Duration::from_millis(100), subscriber.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.event.event_type(), "reservation_created");
    }

    #[tokio::test]
    async fn user_subscription_skips_other_users() {
        let bus = EventBus::new();
        let mut only_seven = bus.subscribe_user(7);

        bus.publish(booked_by(3));
        bus.publish(booked_by(7));

        let received = tokio::time::timeout(Duration::from_millis(100), only_seven.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.event.user_id(), 7);
    }

    #[test]
    fn publish_without_subscribers_reaches_nobody() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(booked_by(2)), 0);
    }

    #[test]
    fn dropping_a_subscriber_releases_it() {
        let bus = EventBus::new();
        let first = bus.subscribe();
        let _second = bus.subscribe_user(1);
        assert_eq!(bus.subscriber_count(), 2);

        drop(first);
        assert_eq!(bus.subscriber_count(), 1);
    }
}
