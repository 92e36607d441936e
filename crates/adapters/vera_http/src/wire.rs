//! JSON documents returned by `data_request`.
//!
//! The hub is loose about scalar types: ids and values show up as numbers
//! or as strings depending on firmware, so both are accepted everywhere.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use verasync_domain::attribute::Attribute;
use verasync_domain::delta::{RawDelta, RawState};
use verasync_domain::device::Device;
use verasync_domain::id::{DeviceId, RoomId};
use verasync_domain::poll::{PollToken, StatusReport};

use crate::error::VeraHttpError;

fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let text = scalar_text(deserializer)?;
    text.trim().parse().map_err(serde::de::Error::custom)
}

/// Like [`lenient_u32`], with `null` or an empty string read as `0`.
fn lenient_u32_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let text = scalar_text(deserializer)?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }
    text.parse().map_err(serde::de::Error::custom)
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let text = scalar_text(deserializer)?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse().map(Some).map_err(serde::de::Error::custom)
}

/// Body of `id=lu_status`.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    #[serde(rename = "DataVersion", default, deserialize_with = "lenient_i64")]
    data_version: Option<i64>,
    #[serde(rename = "LoadTime", default, deserialize_with = "lenient_i64")]
    load_time: Option<i64>,
    #[serde(default)]
    devices: Option<Vec<DeltaBody>>,
    #[serde(default)]
    tasks: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct DeltaBody {
    #[serde(deserialize_with = "lenient_u32")]
    id: u32,
    #[serde(default)]
    states: Vec<StateBody>,
}

#[derive(Debug, Deserialize)]
struct StateBody {
    variable: String,
    #[serde(default, deserialize_with = "scalar_text")]
    value: String,
}

impl StatusBody {
    pub(crate) fn into_report(self) -> Result<StatusReport, VeraHttpError> {
        let data_version = self
            .data_version
            .ok_or(VeraHttpError::MissingField("DataVersion"))?;
        let load_time = self
            .load_time
            .ok_or(VeraHttpError::MissingField("LoadTime"))?;
        let devices = self.devices.map(|devices| {
            devices
                .into_iter()
                .map(|delta| {
                    RawDelta::new(
                        DeviceId::new(delta.id),
                        delta
                            .states
                            .into_iter()
                            .map(|state| RawState::new(state.variable, state.value))
                            .collect(),
                    )
                })
                .collect()
        });
        Ok(StatusReport {
            token: PollToken::new(data_version, load_time),
            devices,
            tasks: self.tasks,
        })
    }
}

/// Body of `id=user_data`: static device and room catalogue.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserData {
    #[serde(default)]
    pub devices: Vec<DeviceInfo>,
    #[serde(default)]
    pub rooms: Vec<RoomInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeviceInfo {
    #[serde(deserialize_with = "lenient_u32")]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_u32_or_zero")]
    pub room: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RoomInfo {
    #[serde(deserialize_with = "lenient_u32")]
    pub id: u32,
    pub name: String,
}

impl UserData {
    pub(crate) fn device(&self, id: DeviceId) -> Option<&DeviceInfo> {
        self.devices.iter().find(|info| info.id == id.get())
    }

    pub(crate) fn device_named(&self, name: &str) -> Option<&DeviceInfo> {
        self.devices.iter().find(|info| info.name == name)
    }
}

/// Per-device part of `id=status`.
#[derive(Debug, Deserialize)]
pub(crate) struct DeviceStatus {
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub id: Option<u32>,
    #[serde(default)]
    states: Vec<AttributeBody>,
}

fn lenient_opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    lenient_u32(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct AttributeBody {
    variable: String,
    #[serde(default)]
    service: String,
    #[serde(default)]
    value: Value,
}

impl DeviceStatus {
    /// Combine catalogue info and state variables into a snapshot.
    pub(crate) fn into_device(self, info: &DeviceInfo) -> Device {
        self.states
            .into_iter()
            .fold(
                Device::builder(DeviceId::new(info.id))
                    .name(info.name.as_str())
                    .room(RoomId::new(info.room)),
                |builder, attr| {
                    builder.attribute(Attribute::from_snapshot(
                        attr.variable,
                        attr.service,
                        &attr.value,
                    ))
                },
            )
            .build()
    }
}

/// Body of `id=status` without a device number.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatusAll {
    #[serde(default)]
    pub devices: Vec<DeviceStatus>,
}
