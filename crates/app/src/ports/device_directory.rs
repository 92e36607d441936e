//! Device directory port — read access to the hub's device catalogue.

use std::collections::HashMap;
use std::future::Future;

use verasync_domain::device::Device;
use verasync_domain::error::SyncError;
use verasync_domain::id::{DeviceId, RoomId};

/// Source of full device snapshots.
///
/// The device cache only calls [`get_device`](Self::get_device) (lazy
/// population) and [`list_all`](Self::list_all) (bulk preload).
pub trait DeviceDirectory {
    /// Fetch the current snapshot of one device.
    ///
    /// Fails with [`SyncError::NotFound`] when the hub does not know `id`.
    fn get_device(&self, id: DeviceId) -> impl Future<Output = Result<Device, SyncError>> + Send;

    /// Fetch the snapshot of the device with the given display name.
    fn get_device_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Device, SyncError>> + Send;

    /// Fetch snapshots of every user-facing device.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Device>, SyncError>> + Send;

    /// Room names keyed by room id.
    fn rooms(&self) -> impl Future<Output = Result<HashMap<RoomId, String>, SyncError>> + Send;
}
