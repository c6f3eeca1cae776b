//! In-memory device repository.
//!
//! Backs tests and small deployments that keep their devices in a JSON file.

use async_trait::async_trait;
use provision_types::DeviceRecord;
use std::path::Path;
use tokio::sync::RwLock;

use crate::modules::repository::{validate_device, DeviceRepository, RepoResult, RepositoryError};

#[derive(Default)]
pub struct InMemoryDeviceRepository {
    devices: RwLock<Vec<DeviceRecord>>,
}

impl InMemoryDeviceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_devices(devices: Vec<DeviceRecord>) -> Self {
        Self { devices: RwLock::new(devices) }
    }

    /// Load a JSON array of device records.
    pub async fn from_json_file(path: &Path) -> RepoResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RepositoryError::Database(format!("{}: {}", path.display(), e)))?;
        let devices: Vec<DeviceRecord> = serde_json::from_str(&content)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        for (i, device) in devices.iter().enumerate() {
            validate_device(device)?;
            check_unique(&devices[..i], device)?;
        }
        tracing::info!("Loaded {} devices from {}", devices.len(), path.display());
        Ok(Self::with_devices(devices))
    }
}

/// Same constraints as the `devices` table: unique `key`, unique `(token, mac)`.
fn check_unique(devices: &[DeviceRecord], device: &DeviceRecord) -> RepoResult<()> {
    for other in devices.iter().filter(|d| d.id != device.id) {
        if device.key.is_some() && other.key == device.key {
            return Err(RepositoryError::Invalid(format!(
                "device {}: key already used by device {}",
                device.id, other.id
            )));
        }
        if device.token.is_some()
            && device.mac.is_some()
            && other.token == device.token
            && other.mac == device.mac
        {
            return Err(RepositoryError::Invalid(format!(
                "device {}: token and mac already used by device {}",
                device.id, other.id
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl DeviceRepository for InMemoryDeviceRepository {
    async fn find_by_key(&self, key: &str) -> RepoResult<Option<DeviceRecord>> {
        let devices = self.devices.read().await;
        Ok(devices.iter().find(|d| d.key.as_deref() == Some(key)).cloned())
    }

    async fn find_by_token(&self, token: &str, mac: &str) -> RepoResult<Option<DeviceRecord>> {
        let devices = self.devices.read().await;
        Ok(devices
            .iter()
            .find(|d| d.token.as_deref() == Some(token) && d.mac.as_deref() == Some(mac))
            .cloned())
    }

    async fn upsert_device(&self, device: DeviceRecord) -> RepoResult<DeviceRecord> {
        validate_device(&device)?;
        let mut devices = self.devices.write().await;
        check_unique(&devices, &device)?;
        match devices.iter_mut().find(|d| d.id == device.id) {
            Some(existing) => *existing = device.clone(),
            None => devices.push(device.clone()),
        }
        Ok(device)
    }

    async fn list_devices(&self) -> RepoResult<Vec<DeviceRecord>> {
        Ok(self.devices.read().await.clone())
    }
}
