//! In-memory fakes of the ports, shared by the service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use verasync_domain::attribute::{Attribute, AttributeValue};
use verasync_domain::delta::{RawDelta, RawState};
use verasync_domain::device::{Capability, Device};
use verasync_domain::error::{NotFoundError, SyncError};
use verasync_domain::event::DeviceEvent;
use verasync_domain::id::{DeviceId, RoomId};
use verasync_domain::poll::{PollParams, PollToken, StatusReport};

use crate::ports::{DeviceDirectory, EventSink, StatusTransport};

#[derive(Default)]
pub struct FakeDirectory {
    devices: HashMap<DeviceId, Device>,
    pub lookups: Arc<AtomicUsize>,
}

impl FakeDirectory {
    pub fn with(devices: impl IntoIterator<Item = Device>) -> Self {
        Self {
            devices: devices.into_iter().map(|d| (d.id, d)).collect(),
            lookups: Arc::default(),
        }
    }

    pub fn lookup_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.lookups)
    }
}

fn not_found(id: String) -> SyncError {
    NotFoundError {
        entity: "Device",
        id,
    }
    .into()
}

impl DeviceDirectory for FakeDirectory {
    async fn get_device(&self, id: DeviceId) -> Result<Device, SyncError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.devices
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id.to_string()))
    }

    async fn get_device_by_name(&self, name: &str) -> Result<Device, SyncError> {
        self.devices
            .values()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| not_found(name.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<Device>, SyncError> {
        Ok(self.devices.values().cloned().collect())
    }

    async fn rooms(&self) -> Result<HashMap<RoomId, String>, SyncError> {
        Ok(HashMap::from([(RoomId::new(0), "No Room".to_string())]))
    }
}

/// Transport that replays a fixed script of outcomes and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<StatusReport, SyncError>>>,
    pub requests: Arc<Mutex<Vec<(PollToken, PollParams)>>>,
}

impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = Result<StatusReport, SyncError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Arc::default(),
        }
    }

    pub fn request_log(&self) -> Arc<Mutex<Vec<(PollToken, PollParams)>>> {
        Arc::clone(&self.requests)
    }
}

impl StatusTransport for ScriptedTransport {
    async fn fetch_status(
        &self,
        token: PollToken,
        params: PollParams,
    ) -> Result<StatusReport, SyncError> {
        self.requests.lock().unwrap().push((token, params));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SyncError::Transport("script exhausted".into())))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<DeviceEvent>>,
}

impl RecordingSink {
    pub fn taken(&self) -> Vec<DeviceEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl EventSink for RecordingSink {
    fn send(&self, event: DeviceEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// A switchable, power-metered lamp with `Status=0` and `Watts=0.0`.
pub fn lamp(id: u32) -> Device {
    Device::builder(DeviceId::new(id))
        .name(format!("Lamp {id}"))
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
        .attribute(Attribute::new(
            "Label",
            "urn:micasaverde-com:serviceId:HaDevice1",
            AttributeValue::String("lamp".into()),
        ))
        .build()
}

/// A scene controller whose last activated button is `1`.
pub fn remote(id: u32) -> Device {
    Device::builder(DeviceId::new(id))
        .name(format!("Remote {id}"))
        .attribute(Attribute::new(
            "sl_SceneActivated",
            "urn:micasaverde-com:serviceId:SceneController1",
            AttributeValue::Int(1),
        ))
        .attribute(Attribute::new(
            "LastSceneTime",
            "urn:micasaverde-com:serviceId:SceneController1",
            AttributeValue::Int(100),
        ))
        .build()
}

pub fn delta(id: u32, states: &[(&str, &str)]) -> RawDelta {
    RawDelta::new(
        DeviceId::new(id),
        states
            .iter()
            .map(|(variable, value)| RawState::new(*variable, *value))
            .collect(),
    )
}

pub fn report(version: i64, devices: Vec<RawDelta>) -> StatusReport {
    StatusReport {
        token: PollToken::new(version, 1_700_000_000),
        devices: Some(devices),
        tasks: None,
    }
}
