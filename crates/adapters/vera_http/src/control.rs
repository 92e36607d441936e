//! Device control through `id=action`.
//!
//! The cache is not updated here; the next status poll reports the new state.

use serde_json::Value;
use verasync_domain::device::{Capability, Device};
use verasync_domain::error::SyncError;

use crate::client::VeraClient;

const SET_TARGET: &str = "SetTarget";
const SET_LEVEL: &str = "SetLoadLevelTarget";

impl VeraClient {
    async fn action(
        &self,
        device: &Device,
        capability: Capability,
        action: &str,
        argument: (&str, &str),
    ) -> Result<Value, SyncError> {
        if !device.has_capability(capability) {
            return Err(SyncError::NoInterface {
                device: device.id,
                capability,
            });
        }
        let device_num = device.id.to_string();
        let url = self.data_url(
            "action",
            &[
                ("DeviceNum", device_num.as_str()),
                ("serviceId", capability.service_id()),
                ("action", action),
                argument,
            ],
        )?;
        tracing::info!(device = %device.id, name = %device.name, %capability, action, value = argument.1, "sending action");
        Ok(self.get_json(url, self.request_timeout()).await?)
    }

    /// Switch the device on or off.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NoInterface`] when the device is not a switch,
    /// otherwise the mapped request error.
    pub async fn set_switch(&self, device: &Device, on: bool) -> Result<Value, SyncError> {
        let target = if on { "1" } else { "0" };
        self.action(device, Capability::Switch, SET_TARGET, ("newTargetValue", target))
            .await
    }

    /// # Errors
    ///
    /// See [`VeraClient::set_switch`].
    pub async fn turn_on(&self, device: &Device) -> Result<Value, SyncError> {
        self.set_switch(device, true).await
    }

    /// # Errors
    ///
    /// See [`VeraClient::set_switch`].
    pub async fn turn_off(&self, device: &Device) -> Result<Value, SyncError> {
        self.set_switch(device, false).await
    }

    /// Invert the last-known `Status` of the device.
    ///
    /// # Errors
    ///
    /// See [`VeraClient::set_switch`].
    pub async fn toggle(&self, device: &Device) -> Result<Value, SyncError> {
        let on = device
            .value("Status")
            .and_then(verasync_domain::attribute::AttributeValue::to_bool)
            .unwrap_or(false);
        self.set_switch(device, !on).await
    }

    /// Set a dimmer to `level` percent (clamped to 100).
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NoInterface`] when the device is not a dimmer,
    /// otherwise the mapped request error.
    pub async fn set_dimmer_level(&self, device: &Device, level: u8) -> Result<Value, SyncError> {
        let level = level.min(100).to_string();
        self.action(device, Capability::Dimmer, SET_LEVEL, ("newLoadlevelTarget", level.as_str()))
            .await
    }
}
