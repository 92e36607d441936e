//! Event sink port — fire-and-forget delivery of outbound device events.

use verasync_domain::event::DeviceEvent;

/// Accepts flat device events. Delivery is not acknowledged.
///
/// Implementations must not block: handlers call this from the middle of
/// change detection.
pub trait EventSink {
    /// Hand one event to the sink.
    fn send(&self, event: DeviceEvent);
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn send(&self, event: DeviceEvent) {
        (**self).send(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn send(&self, event: DeviceEvent) {
        (**self).send(event);
    }
}
