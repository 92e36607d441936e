//! Vera hub connection configuration.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::VeraHttpError;

/// Where the hub lives and how long plain requests may take.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VeraConfig {
    pub host: String,
    pub port: u16,
    /// Timeout for snapshot and control requests, in seconds.
    ///
    /// Long-poll requests get this much on top of the hub's own timeout.
    pub request_timeout_secs: u64,
}

impl Default for VeraConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3480,
            request_timeout_secs: 10,
        }
    }
}

impl VeraConfig {
    /// Root URL every `data_request` path is joined onto.
    ///
    /// # Errors
    ///
    /// Returns [`VeraHttpError::InvalidUrl`] when host and port do not form a URL.
    pub fn base_url(&self) -> Result<Url, VeraHttpError> {
        Ok(Url::parse(&format!("http://{}:{}/", self.host, self.port))?)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
