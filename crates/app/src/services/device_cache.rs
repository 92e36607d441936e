//! Device cache — lazily populated mirror of every device's attributes.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use verasync_domain::device::Device;
use verasync_domain::error::SyncError;
use verasync_domain::id::DeviceId;

use crate::ports::DeviceDirectory;

/// Last-known state of each device, keyed by id.
///
/// A device is fetched from the directory the first time it is resolved and
/// kept for the lifetime of the cache. Only the change detector mutates the
/// stored attributes.
pub struct DeviceCache<D> {
    directory: D,
    devices: HashMap<DeviceId, Device>,
}

impl<D: DeviceDirectory> DeviceCache<D> {
    /// Create an empty cache backed by the given directory.
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            devices: HashMap::new(),
        }
    }

    /// Return the cached device, loading its snapshot on first access.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] when the directory does not know `id`,
    /// or whatever transport error the directory hit while loading it.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&mut self, id: DeviceId) -> Result<&mut Device, SyncError> {
        match self.devices.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let device = self.directory.get_device(id).await?;
                tracing::debug!(device = %id, name = %device.name, "loaded device snapshot");
                Ok(entry.insert(device))
            }
        }
    }

    /// Reload a device snapshot from the directory.
    ///
    /// Without `only` the whole cached device is replaced. With `only` just
    /// the named attributes are; names missing from the fresh snapshot keep
    /// their cached value. A device not cached yet is inserted as loaded.
    ///
    /// # Errors
    ///
    /// Returns the directory error and leaves the cache untouched.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(
        &mut self,
        id: DeviceId,
        only: Option<&[&str]>,
    ) -> Result<&mut Device, SyncError> {
        let mut fresh = self.directory.get_device(id).await?;
        match self.devices.entry(id) {
            Entry::Vacant(entry) => Ok(entry.insert(fresh)),
            Entry::Occupied(entry) => {
                let cached = entry.into_mut();
                match only {
                    None => *cached = fresh,
                    Some(names) => {
                        for name in names {
                            match fresh.attributes.remove(*name) {
                                Some(attr) => {
                                    cached.attributes.insert((*name).to_string(), attr);
                                }
                                None => {
                                    tracing::debug!(device = %id, variable = %name, "attribute missing from fresh snapshot");
                                }
                            }
                        }
                    }
                }
                Ok(cached)
            }
        }
    }

    /// Load every device the directory lists, replacing nothing already cached.
    ///
    /// # Errors
    ///
    /// Propagates the directory error.
    pub async fn preload(&mut self) -> Result<usize, SyncError> {
        let devices = self.directory.list_all().await?;
        let mut added = 0;
        for device in devices {
            if let Entry::Vacant(entry) = self.devices.entry(device.id) {
                entry.insert(device);
                added += 1;
            }
        }
        tracing::debug!(added, total = self.devices.len(), "preloaded device cache");
        Ok(added)
    }

    /// Cached device, without touching the directory.
    #[must_use]
    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use verasync_domain::attribute::AttributeValue;

    use super::*;
    use crate::test_support::{FakeDirectory, lamp, remote};

    #[tokio::test]
    async fn should_load_device_on_first_resolve() {
        let directory = FakeDirectory::with([lamp(7)]);
        let lookups = directory.lookup_count();
        let mut cache = DeviceCache::new(directory);

        let device = cache.resolve(DeviceId::new(7)).await.unwrap();

        assert_eq!(device.name, "Lamp 7");
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn should_not_reload_cached_device() {
        let directory = FakeDirectory::with([lamp(7)]);
        let lookups = directory.lookup_count();
        let mut cache = DeviceCache::new(directory);

        cache.resolve(DeviceId::new(7)).await.unwrap();
        cache.resolve(DeviceId::new(7)).await.unwrap();

        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn should_keep_mutations_visible_to_later_resolves() {
        let mut cache = DeviceCache::new(FakeDirectory::with([lamp(7)]));

        cache
            .resolve(DeviceId::new(7))
            .await
            .unwrap()
            .commit("Status", AttributeValue::Int(1));

        let device = cache.resolve(DeviceId::new(7)).await.unwrap();
        assert_eq!(device.value("Status"), Some(&AttributeValue::Int(1)));
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_device() {
        let mut cache = DeviceCache::new(FakeDirectory::default());

        let err = cache.resolve(DeviceId::new(99)).await.unwrap_err();

        assert!(matches!(err, SyncError::NotFound(_)));
        assert!(cache.is_empty());
    }

    async fn dirty_cache() -> DeviceCache<FakeDirectory> {
        let mut cache = DeviceCache::new(FakeDirectory::with([lamp(7)]));
        let device = cache.resolve(DeviceId::new(7)).await.unwrap();
        device.commit("Status", AttributeValue::Int(1));
        device.commit("Watts", AttributeValue::Float(5.0));
        device.commit("Comment", AttributeValue::from("seen in a delta"));
        cache
    }

    #[tokio::test]
    async fn should_replace_whole_device_on_refresh() {
        let mut cache = dirty_cache().await;
        let lookups = cache.directory.lookup_count();

        let device = cache.refresh(DeviceId::new(7), None).await.unwrap();

        assert_eq!(device.value("Status"), Some(&AttributeValue::Int(0)));
        assert_eq!(device.value("Watts"), Some(&AttributeValue::Float(0.0)));
        assert_eq!(device.value("Comment"), None);
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn should_refresh_only_named_attributes() {
        let mut cache = dirty_cache().await;

        let device = cache
            .refresh(DeviceId::new(7), Some(&["Status", "Missing"]))
            .await
            .unwrap();

        assert_eq!(device.value("Status"), Some(&AttributeValue::Int(0)));
        assert_eq!(device.value("Watts"), Some(&AttributeValue::Float(5.0)));
        assert_eq!(device.value("Comment"), Some(&AttributeValue::from("seen in a delta")));
        assert_eq!(device.value("Missing"), None);
    }

    #[tokio::test]
    async fn should_insert_uncached_device_on_refresh() {
        let mut cache = DeviceCache::new(FakeDirectory::with([lamp(7)]));

        cache.refresh(DeviceId::new(7), Some(&["Status"])).await.unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(DeviceId::new(7)).unwrap().value("Watts"),
            Some(&AttributeValue::Float(0.0))
        );
    }

    #[tokio::test]
    async fn should_keep_cache_when_refresh_fails() {
        let mut cache = dirty_cache().await;

        let err = cache.refresh(DeviceId::new(99), None).await.unwrap_err();

        assert!(matches!(err, SyncError::NotFound(_)));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn should_preload_without_overwriting_cached_devices() {
        let mut cache = DeviceCache::new(FakeDirectory::with([lamp(7), remote(9)]));
        cache
            .resolve(DeviceId::new(7))
            .await
            .unwrap()
            .commit("Status", AttributeValue::Int(1));

        let added = cache.preload().await.unwrap();

        assert_eq!(added, 1);
        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.get(DeviceId::new(7)).unwrap().value("Status"),
            Some(&AttributeValue::Int(1))
        );
    }
}
