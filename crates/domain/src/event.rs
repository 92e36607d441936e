//! Events produced by change detection and sent to the outside world.
//!
//! A [`ChangeEvent`] is internal: one per attribute that really changed.
//! A [`DeviceEvent`] is the flat record a dispatch handler forwards to the
//! event sink.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::attribute::AttributeValue;
use crate::delta::DeltaMap;
use crate::id::DeviceId;
use crate::time::{Timestamp, now};

/// Sender tag carried by every event emitted for a device change.
pub const DEVICES_SENDER: &str = "devices";

/// One attribute of one device changed value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub device: DeviceId,
    pub variable: String,
    /// Value before the change, or `None` for a variable seen for the first time.
    pub old_value: Option<AttributeValue>,
    /// Value after the change, already coerced.
    pub new_value: AttributeValue,
    /// Every raw variable of the delta this change came from.
    pub delta: Arc<DeltaMap>,
    pub observed_at: Timestamp,
}

impl ChangeEvent {
    #[must_use]
    pub fn new(
        device: DeviceId,
        variable: impl Into<String>,
        old_value: Option<AttributeValue>,
        new_value: AttributeValue,
        delta: Arc<DeltaMap>,
    ) -> Self {
        Self {
            device,
            variable: variable.into(),
            old_value,
            new_value,
            delta,
            observed_at: now(),
        }
    }
}

/// Flat `key -> primitive` record handed to the event sink.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct DeviceEvent {
    fields: BTreeMap<String, AttributeValue>,
}

impl DeviceEvent {
    /// Start an event about the named device, tagged with [`DEVICES_SENDER`].
    #[must_use]
    pub fn for_device(device_name: &str) -> Self {
        Self::default()
            .field("sender", DEVICES_SENDER)
            .field("device", device_name)
    }

    /// Set a field, replacing any previous value under the same key.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, AttributeValue> {
        &self.fields
    }
}
