//! Vera HTTP adapter error types.

use verasync_domain::error::{NotFoundError, SyncError};
use verasync_domain::id::DeviceId;

/// Errors specific to talking to the hub over HTTP.
#[derive(Debug, thiserror::Error)]
pub enum VeraHttpError {
    /// Connection refused, dropped, or timed out.
    #[error("request to hub failed")]
    Request(#[from] reqwest::Error),

    /// The hub answered with a non-success status code.
    #[error("hub answered with HTTP {status}")]
    Status { status: u16 },

    /// The body is not the JSON document we expected.
    #[error("invalid JSON from hub")]
    Decode(#[from] serde_json::Error),

    /// The body is JSON but lacks a required field.
    #[error("hub response is missing {0}")]
    MissingField(&'static str),

    #[error("invalid hub URL")]
    InvalidUrl(#[from] url::ParseError),

    /// The hub does not know the device.
    #[error("device {0} not found")]
    DeviceNotFound(String),
}

impl VeraHttpError {
    pub(crate) fn device_not_found(id: DeviceId) -> Self {
        Self::DeviceNotFound(id.to_string())
    }

    /// Map into the domain taxonomy: link problems become
    /// [`SyncError::Transport`], malformed bodies [`SyncError::Protocol`].
    #[must_use]
    pub fn into_domain(self) -> SyncError {
        match self {
            Self::DeviceNotFound(id) => NotFoundError {
                entity: "Device",
                id,
            }
            .into(),
            err @ (Self::Decode(_) | Self::MissingField(_)) => SyncError::Protocol(Box::new(err)),
            other => SyncError::Transport(Box::new(other)),
        }
    }
}

impl From<VeraHttpError> for SyncError {
    fn from(err: VeraHttpError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_status_error() {
        let err = VeraHttpError::Status { status: 503 };
        assert_eq!(err.to_string(), "hub answered with HTTP 503");
    }

    #[test]
    fn should_display_missing_field() {
        let err = VeraHttpError::MissingField("DataVersion");
        assert_eq!(err.to_string(), "hub response is missing DataVersion");
    }

    #[test]
    fn should_convert_decode_error_to_protocol_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err: SyncError = VeraHttpError::Decode(json_err).into();
        assert!(matches!(err, SyncError::Protocol(_)));
    }

    #[test]
    fn should_convert_missing_field_to_protocol_error() {
        let err: SyncError = VeraHttpError::MissingField("LoadTime").into();
        assert!(matches!(err, SyncError::Protocol(_)));
    }

    #[test]
    fn should_convert_status_to_transport_error() {
        let err: SyncError = VeraHttpError::Status { status: 500 }.into();
        assert!(err.is_link_failure());
        assert!(matches!(err, SyncError::Transport(_)));
    }

    #[test]
    fn should_convert_unknown_device_to_not_found() {
        let err: SyncError = VeraHttpError::device_not_found(DeviceId::new(12)).into();
        assert_eq!(err.to_string(), "not found");
        let SyncError::NotFound(inner) = err else {
            panic!("expected not found");
        };
        assert_eq!(inner.to_string(), "Device 12 not found");
    }
}
