//! HTTP client for the hub's `data_request` endpoint.
//!
//! Wraps `reqwest::Client` with URL construction, status checking and JSON
//! decoding. Polling and control live in sibling modules as inherent methods
//! and trait impls on the same client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use url::Url;
use verasync_app::ports::DeviceDirectory;
use verasync_domain::device::Device;
use verasync_domain::error::SyncError;
use verasync_domain::id::{DeviceId, RoomId};

use crate::config::VeraConfig;
use crate::error::VeraHttpError;
use crate::wire::{DeviceStatus, StatusAll, UserData};

/// Name the hub gives its own Z-Wave controller entry.
pub const CONTROLLER_NAME: &str = "ZWave";

/// Room name for devices not assigned to any room.
pub const NO_ROOM: &str = "No Room";

/// Room name for a room id missing from the catalogue.
pub const UNKNOWN_ROOM: &str = "UNKNOWN";

/// Client for one Vera hub.
///
/// Cloning is cheap and clones share the connection pool and the cached
/// `user_data` catalogue.
#[derive(Clone)]
pub struct VeraClient {
    http: reqwest::Client,
    base_url: Url,
    request_timeout: Duration,
    user_data: Arc<OnceCell<UserData>>,
}

impl VeraClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VeraHttpError::InvalidUrl`] for a bad host, or
    /// [`VeraHttpError::Request`] if the HTTP client cannot be created.
    pub fn new(config: &VeraConfig) -> Result<Self, VeraHttpError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(http, config.base_url()?).with_request_timeout(config.request_timeout()))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// `base_url` is the hub root, e.g. `http://192.168.1.20:3480/`.
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            request_timeout: Duration::from_secs(10),
            user_data: Arc::new(OnceCell::new()),
        }
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// `data_request?id=<id>&<params>&output_format=json`.
    pub(crate) fn data_url(&self, id: &str, params: &[(&str, &str)]) -> Result<Url, VeraHttpError> {
        let mut url = self.base_url.join("data_request")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("id", id);
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("output_format", "json");
        }
        Ok(url)
    }

    /// Send a GET and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        timeout: Duration,
    ) -> Result<T, VeraHttpError> {
        tracing::debug!("GET {url}");
        let resp = self.http.get(url).timeout(timeout).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(VeraHttpError::Status {
                status: status.as_u16(),
            });
        }
        let body = resp.text().await?;
        tracing::trace!(%body, "hub response");
        Ok(serde_json::from_str(&body)?)
    }

    /// Device and room catalogue, fetched once per client.
    async fn user_data(&self) -> Result<&UserData, VeraHttpError> {
        self.user_data
            .get_or_try_init(|| async {
                let url = self.data_url("user_data", &[])?;
                self.get_json(url, self.request_timeout).await
            })
            .await
    }

    /// Load one device snapshot from `id=status&DeviceNum=<id>`.
    ///
    /// # Errors
    ///
    /// Returns [`VeraHttpError::DeviceNotFound`] when the catalogue or the
    /// status document does not list the device.
    pub async fn fetch_device(&self, id: DeviceId) -> Result<Device, VeraHttpError> {
        let info = self
            .user_data()
            .await?
            .device(id)
            .cloned()
            .ok_or_else(|| VeraHttpError::device_not_found(id))?;
        let device_num = id.to_string();
        let url = self.data_url("status", &[("DeviceNum", device_num.as_str())])?;
        let mut body: serde_json::Map<String, serde_json::Value> =
            self.get_json(url, self.request_timeout).await?;
        let status = body
            .remove(&format!("Device_Num_{id}"))
            .ok_or_else(|| VeraHttpError::device_not_found(id))?;
        let status: DeviceStatus = serde_json::from_value(status)?;
        Ok(status.into_device(&info))
    }

    /// Load the device whose catalogue name is `name`.
    ///
    /// # Errors
    ///
    /// Returns [`VeraHttpError::DeviceNotFound`] when no device has that name.
    pub async fn fetch_device_by_name(&self, name: &str) -> Result<Device, VeraHttpError> {
        let id = self
            .user_data()
            .await?
            .device_named(name)
            .map(|info| DeviceId::new(info.id))
            .ok_or_else(|| VeraHttpError::DeviceNotFound(name.to_string()))?;
        self.fetch_device(id).await
    }

    /// Load every device from a single `id=status` request.
    ///
    /// Devices missing from the catalogue are skipped. The Z-Wave controller
    /// itself is skipped unless `include_controller` is set.
    ///
    /// # Errors
    ///
    /// Propagates request and decoding errors.
    pub async fn fetch_all(&self, include_controller: bool) -> Result<Vec<Device>, VeraHttpError> {
        let catalogue = self.user_data().await?;
        let url = self.data_url("status", &[])?;
        let body: StatusAll = self.get_json(url, self.request_timeout).await?;
        let mut devices = Vec::with_capacity(body.devices.len());
        for status in body.devices {
            let Some(id) = status.id.map(DeviceId::new) else {
                tracing::warn!("status entry without device id");
                continue;
            };
            let Some(info) = catalogue.device(id) else {
                tracing::warn!(device = %id, "missed device absent from user_data");
                continue;
            };
            if info.name == CONTROLLER_NAME && !include_controller {
                continue;
            }
            devices.push(status.into_device(info));
        }
        Ok(devices)
    }

    /// Room names by id, including room `0` as [`NO_ROOM`].
    ///
    /// # Errors
    ///
    /// Propagates the `user_data` request error.
    pub async fn fetch_rooms(&self) -> Result<HashMap<RoomId, String>, VeraHttpError> {
        let catalogue = self.user_data().await?;
        let mut rooms = HashMap::from([(RoomId::new(0), NO_ROOM.to_string())]);
        rooms.extend(
            catalogue
                .rooms
                .iter()
                .map(|room| (RoomId::new(room.id), room.name.clone())),
        );
        Ok(rooms)
    }

    /// Name of the room `device` sits in, or [`UNKNOWN_ROOM`].
    ///
    /// # Errors
    ///
    /// Propagates the `user_data` request error.
    pub async fn room_name(&self, device: &Device) -> Result<String, VeraHttpError> {
        Ok(self
            .fetch_rooms()
            .await?
            .remove(&device.room)
            .unwrap_or_else(|| UNKNOWN_ROOM.to_string()))
    }
}

impl DeviceDirectory for VeraClient {
    async fn get_device(&self, id: DeviceId) -> Result<Device, SyncError> {
        Ok(self.fetch_device(id).await?)
    }

    async fn get_device_by_name(&self, name: &str) -> Result<Device, SyncError> {
        Ok(self.fetch_device_by_name(name).await?)
    }

    async fn list_all(&self) -> Result<Vec<Device>, SyncError> {
        Ok(self.fetch_all(false).await?)
    }

    async fn rooms(&self) -> Result<HashMap<RoomId, String>, SyncError> {
        Ok(self.fetch_rooms().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> VeraClient {
        VeraClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://10.0.0.2:3480/").unwrap(),
        )
    }

    #[test]
    fn should_build_data_request_url() {
        let url = client()
            .data_url("status", &[("DeviceNum", "7")])
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://10.0.0.2:3480/data_request?id=status&DeviceNum=7&output_format=json"
        );
    }

    #[test]
    fn should_share_catalogue_between_clones() {
        let original = client();
        let clone = original.clone();

        assert!(Arc::ptr_eq(&original.user_data, &clone.user_data));
    }
}
