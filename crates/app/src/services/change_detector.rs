//! Change detector — turns raw deltas into typed change events and commits
//! them into the device cache.

use std::sync::Arc;

use verasync_domain::attribute::AttributeValue;
use verasync_domain::delta::{DeltaMap, RawDelta, SCENE_ACTIVATED};
use verasync_domain::device::Device;
use verasync_domain::error::SyncError;
use verasync_domain::event::ChangeEvent;

use crate::ports::{DeviceDirectory, EventSink};
use crate::services::device_cache::DeviceCache;
use crate::services::dispatcher::Dispatcher;

/// Hook called once per non-empty delta, before any variable is processed.
pub trait DeviceObserver: Send + Sync {
    fn on_device_changed(&self, device: &Device, changes: &DeltaMap);
}

/// Observer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DeviceObserver for NoopObserver {
    fn on_device_changed(&self, _device: &Device, _changes: &DeltaMap) {}
}

impl<F> DeviceObserver for F
where
    F: Fn(&Device, &DeltaMap) + Send + Sync,
{
    fn on_device_changed(&self, device: &Device, changes: &DeltaMap) {
        self(device, changes);
    }
}

/// Compares reported values with the cache, dispatching one event per change.
#[derive(Debug, Default)]
pub struct ChangeDetector<O = NoopObserver> {
    observer: O,
}

impl ChangeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O: DeviceObserver> ChangeDetector<O> {
    /// Replace the per-delta observer hook.
    pub fn with_observer<P: DeviceObserver>(self, observer: P) -> ChangeDetector<P> {
        ChangeDetector { observer }
    }

    /// Process deltas in order and return every change that was dispatched.
    ///
    /// A delta whose device cannot be resolved is skipped, and so is a
    /// variable whose value cannot be coerced; neither stops the batch. Each
    /// change is dispatched before its value is committed to the cache.
    pub async fn detect<D, S>(
        &self,
        cache: &mut DeviceCache<D>,
        dispatcher: &Dispatcher<S>,
        deltas: &[RawDelta],
    ) -> Vec<ChangeEvent>
    where
        D: DeviceDirectory,
        S: EventSink,
    {
        let mut events = Vec::new();
        for delta in deltas {
            let device = match cache.resolve(delta.device).await {
                Ok(device) => device,
                Err(SyncError::NotFound(err)) => {
                    tracing::error!(device = %delta.device, error = %err, "skipping delta for unknown device");
                    continue;
                }
                Err(err) => {
                    tracing::error!(device = %delta.device, error = %err, "unable to load device, skipping delta");
                    continue;
                }
            };

            let changes = delta.to_map();
            if changes.is_empty() {
                continue;
            }
            self.observer.on_device_changed(device, &changes);

            let before = events.len();
            let forced = changes.contains_key(SCENE_ACTIVATED);
            let changes = Arc::new(changes);
            for (variable, raw) in changes.iter() {
                let previous = device.value(variable);
                let new_value = match previous {
                    Some(current) => match current.coerce_like(raw) {
                        Ok(value) => value,
                        Err(err) => {
                            tracing::error!(device = %device.id, variable = %variable, error = %err, "dropping value");
                            continue;
                        }
                    },
                    None => AttributeValue::String(raw.clone()),
                };
                if !forced && previous == Some(&new_value) {
                    continue;
                }

                let event = ChangeEvent::new(
                    device.id,
                    variable.as_str(),
                    previous.cloned(),
                    new_value.clone(),
                    Arc::clone(&changes),
                );
                dispatcher.dispatch(&event, device);
                device.commit(variable, new_value);
                events.push(event);
            }

            let changed = events.len() - before;
            if changed > 0 {
                tracing::debug!(device = %device.id, name = %device.name, changed, forced, "device updated");
            }
        }
        events
    }
}
