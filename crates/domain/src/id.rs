//! Typed identifier newtypes for hub-assigned numeric ids.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw hub identifier.
            #[must_use]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Access the raw hub identifier.
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`Device`](crate::device::Device), stable for the hub's lifetime.
    DeviceId
);

define_id!(
    /// Identifier of a room as reported by the hub's `user_data`.
    RoomId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_through_display_and_from_str() {
        let id = DeviceId::new(42);
        let text = id.to_string();
        let parsed: DeviceId = text.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_parse_with_surrounding_whitespace() {
        let id: RoomId = " 3 ".parse().unwrap();
        assert_eq!(id.get(), 3);
    }

    #[test]
    fn should_serialize_as_plain_number() {
        let json = serde_json::to_string(&DeviceId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn should_return_error_when_parsing_non_numeric_id() {
        let result = DeviceId::from_str("seven");
        assert!(result.is_err());
    }
}
