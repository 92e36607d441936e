//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`SyncError`]
//! via `#[from]` when crossing a port boundary.

use crate::attribute::{AttributeKind, AttributeValue};
use crate::device::Capability;
use crate::id::DeviceId;

/// Boxed error used for failures whose concrete type belongs to an adapter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error shared by the application layer and its ports.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The hub could not be reached, or the connection dropped mid-response.
    #[error("transport error")]
    Transport(#[source] BoxError),

    /// The hub answered with a body that is not the expected JSON shape.
    #[error("protocol error")]
    Protocol(#[source] BoxError),

    /// A device (or other record) does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A raw attribute value could not be converted to its established type.
    #[error("coercion error")]
    Coercion(#[from] CoercionError),

    /// A dispatch handler failed while building its outbound event.
    #[error("handler error")]
    Handler(#[from] HandlerError),

    /// A control request targeted a capability the device does not expose.
    #[error("device {device} has no {capability} interface")]
    NoInterface {
        device: DeviceId,
        capability: Capability,
    },
}

impl SyncError {
    /// Whether this error means the hub link itself is unhealthy, as opposed
    /// to a failure local to this process.
    #[must_use]
    pub fn is_link_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Protocol(_))
    }
}

/// A lookup by identifier found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of record that was looked up (e.g. `"Device"`).
    pub entity: &'static str,
    /// The identifier (or name) used for the lookup.
    pub id: String,
}

/// A raw string could not be converted to the expected attribute type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot coerce {raw:?} to {expected}")]
pub struct CoercionError {
    /// The raw value as reported by the hub.
    pub raw: String,
    /// The type the cached attribute already holds.
    pub expected: AttributeKind,
}

/// A dispatch handler could not build its outbound event.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The value has a shape the handler cannot interpret.
    #[error("{variable} value {value} is not a valid {expected}")]
    InvalidValue {
        variable: String,
        value: AttributeValue,
        expected: &'static str,
    },
}
