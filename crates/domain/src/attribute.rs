//! Attribute — one named state variable of a device.
//!
//! The hub calls these "state variables". Each one belongs to a UPnP-style
//! service (e.g. `urn:upnp-org:serviceId:SwitchPower1`) and carries a value
//! whose type is fixed by the first snapshot that introduced it.

mod value;

pub use value::{AttributeKind, AttributeValue};

use serde::{Deserialize, Serialize};

/// A named, typed state variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// The hub's variable name (e.g. `Status`, `Watts`).
    pub variable: String,
    /// Service id that owns this variable. Empty when the variable was first
    /// seen in a delta rather than a snapshot.
    pub service: String,
    pub value: AttributeValue,
}

impl Attribute {
    /// Create an attribute from already typed parts.
    #[must_use]
    pub fn new(
        variable: impl Into<String>,
        service: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            variable: variable.into(),
            service: service.into(),
            value: value.into(),
        }
    }

    /// Create an attribute from a snapshot entry, typing the raw JSON value.
    #[must_use]
    pub fn from_snapshot(
        variable: impl Into<String>,
        service: impl Into<String>,
        raw: &serde_json::Value,
    ) -> Self {
        Self::new(variable, service, AttributeValue::from_snapshot(raw))
    }
}
