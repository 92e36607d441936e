//! In-process event bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use verasync_domain::event::DeviceEvent;

use crate::ports::EventSink;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Sending succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events sent *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }
}

impl EventSink for InProcessEventBus {
    fn send(&self, event: DeviceEvent) {
        // broadcast::send fails only when there are zero receivers.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_deliver_event_to_subscriber() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();

        let event = DeviceEvent::for_device("Lamp").field("state", true);
        bus.send(event.clone());

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn should_deliver_event_to_multiple_subscribers() {
        let bus = InProcessEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let event = DeviceEvent::for_device("Remote").field("button", 2_i64);
        bus.send(event.clone());

        assert_eq!(rx1.recv().await.unwrap(), event);
        assert_eq!(rx2.recv().await.unwrap(), event);
    }

    #[test]
    fn should_not_panic_when_no_subscribers() {
        let bus = InProcessEventBus::new(16);
        bus.send(DeviceEvent::for_device("Lamp"));
    }

    #[tokio::test]
    async fn should_not_deliver_events_sent_before_subscription() {
        let bus = InProcessEventBus::new(16);
        bus.send(DeviceEvent::for_device("early"));

        let mut rx = bus.subscribe();
        let later = DeviceEvent::for_device("late");
        bus.send(later.clone());

        assert_eq!(rx.recv().await.unwrap(), later);
    }
}
