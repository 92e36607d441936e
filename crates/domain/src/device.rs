//! Device — a physical thing managed by the hub, with its current attributes.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeValue};
use crate::id::{DeviceId, RoomId};

/// Typed control surfaces a device may expose, detected from service ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Switch,
    Dimmer,
}

impl Capability {
    /// Every capability known to this crate.
    pub const ALL: [Self; 2] = [Self::Switch, Self::Dimmer];

    /// Service id whose presence on any attribute enables this capability.
    #[must_use]
    pub fn service_id(self) -> &'static str {
        match self {
            Self::Switch => "urn:upnp-org:serviceId:SwitchPower1",
            Self::Dimmer => "urn:upnp-org:serviceId:Dimming1",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Switch => f.write_str("switch"),
            Self::Dimmer => f.write_str("dimmer"),
        }
    }
}

/// A device and the last-known value of each of its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub room: RoomId,
    pub attributes: HashMap<String, Attribute>,
}

impl Device {
    /// Create a builder for the device with the given id.
    #[must_use]
    pub fn builder(id: DeviceId) -> DeviceBuilder {
        DeviceBuilder {
            id,
            name: String::new(),
            room: RoomId::new(0),
            attributes: HashMap::new(),
        }
    }

    /// Look up an attribute by variable name.
    #[must_use]
    pub fn attribute(&self, variable: &str) -> Option<&Attribute> {
        self.attributes.get(variable)
    }

    /// Current value of an attribute, if the device has it.
    #[must_use]
    pub fn value(&self, variable: &str) -> Option<&AttributeValue> {
        self.attributes.get(variable).map(|attr| &attr.value)
    }

    /// Store a new value for `variable`, returning the value it replaced.
    ///
    /// A variable the device did not know yet is added with an empty service id.
    pub fn commit(&mut self, variable: &str, value: AttributeValue) -> Option<AttributeValue> {
        match self.attributes.get_mut(variable) {
            Some(attr) => Some(std::mem::replace(&mut attr.value, value)),
            None => {
                self.attributes
                    .insert(variable.to_string(), Attribute::new(variable, "", value));
                None
            }
        }
    }

    /// Whether any attribute belongs to the capability's service.
    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        let service = capability.service_id();
        self.attributes.values().any(|attr| attr.service == service)
    }

    /// All capabilities this device exposes.
    #[must_use]
    pub fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|cap| self.has_capability(*cap))
            .collect()
    }

    /// Compact `("name:id", {variable: value})` view for diagnostics.
    #[must_use]
    pub fn dump(&self) -> (String, BTreeMap<String, AttributeValue>) {
        let values = self
            .attributes
            .iter()
            .map(|(name, attr)| (name.clone(), attr.value.clone()))
            .collect();
        (format!("{}:{}", self.name, self.id), values)
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug)]
pub struct DeviceBuilder {
    id: DeviceId,
    name: String,
    room: RoomId,
    attributes: HashMap<String, Attribute>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn room(mut self, room: RoomId) -> Self {
        self.room = room;
        self
    }

    /// Add an attribute; a later attribute with the same variable wins.
    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes
            .insert(attribute.variable.clone(), attribute);
        self
    }

    #[must_use]
    pub fn build(self) -> Device {
        Device {
            id: self.id,
            name: self.name,
            room: self.room,
            attributes: self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> Device {
        Device::builder(DeviceId::new(7))
            .name("Lamp")
            .room(RoomId::new(2))
            .attribute(Attribute::new(
                "Status",
                Capability::Switch.service_id(),
                AttributeValue::Int(0),
            ))
            .attribute(Attribute::new(
                "Watts",
                "urn:micasaverde-com:serviceId:EnergyMetering1",
                AttributeValue::Float(0.0),
            ))
            .build()
    }

    #[test]
    fn should_build_device_with_attributes() {
        let device = lamp();
        assert_eq!(device.name, "Lamp");
        assert_eq!(device.room, RoomId::new(2));
        assert_eq!(device.value("Status"), Some(&AttributeValue::Int(0)));
        assert!(device.attribute("Missing").is_none());
    }

    #[test]
    fn should_return_previous_value_when_committing() {
        let mut device = lamp();
        let old = device.commit("Status", AttributeValue::Int(1));
        assert_eq!(old, Some(AttributeValue::Int(0)));
        assert_eq!(device.value("Status"), Some(&AttributeValue::Int(1)));
        assert_eq!(
            device.attribute("Status").unwrap().service,
            Capability::Switch.service_id()
        );
    }

    #[test]
    fn should_add_unknown_variable_with_empty_service_when_committing() {
        let mut device = lamp();
        let old = device.commit("LastUpdate", AttributeValue::String("123".into()));
        assert!(old.is_none());
        let attr = device.attribute("LastUpdate").unwrap();
        assert!(attr.service.is_empty());
    }

    #[test]
    fn should_detect_capabilities_from_service_ids() {
        let device = lamp();
        assert!(device.has_capability(Capability::Switch));
        assert!(!device.has_capability(Capability::Dimmer));
        assert_eq!(device.capabilities(), vec![Capability::Switch]);
    }

    #[test]
    fn should_dump_name_id_and_values() {
        let (label, values) = lamp().dump();
        assert_eq!(label, "Lamp:7");
        assert_eq!(values.get("Status"), Some(&AttributeValue::Int(0)));
        assert_eq!(values.len(), 2);
    }
}
