//! Device repository trait for storage abstraction.

use async_trait::async_trait;
use provision_types::{DeviceRecord, LookupDescriptor};

pub type RepoResult<T> = Result<T, RepositoryError>;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid device: {0}")]
    Invalid(String),
}

#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Resolve a device by its opaque key.
    async fn find_by_key(&self, key: &str) -> RepoResult<Option<DeviceRecord>>;

    /// Resolve a device by token and hardware address together.
    async fn find_by_token(&self, token: &str, mac: &str) -> RepoResult<Option<DeviceRecord>>;

    /// Insert or replace a device by `id`.
    async fn upsert_device(&self, device: DeviceRecord) -> RepoResult<DeviceRecord>;

    async fn list_devices(&self) -> RepoResult<Vec<DeviceRecord>>;

    /// Dispatch on a lookup descriptor.
    async fn find_one(&self, lookup: &LookupDescriptor) -> RepoResult<Option<DeviceRecord>> {
        match lookup {
            LookupDescriptor::Key { key } => self.find_by_key(key).await,
            LookupDescriptor::Token { token, mac } => self.find_by_token(token, mac).await,
        }
    }
}

/// Reject records that could never be looked up.
pub(crate) fn validate_device(device: &DeviceRecord) -> RepoResult<()> {
    if device.id.trim().is_empty() {
        return Err(RepositoryError::Invalid("device id is empty".to_string()));
    }
    if device.key.is_none() && device.token.is_none() {
        return Err(RepositoryError::Invalid(format!(
            "device {} has neither key nor token",
            device.id
        )));
    }
    Ok(())
}
