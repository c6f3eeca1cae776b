//! Device store selection at startup.

use std::path::Path;
use std::sync::Arc;

use provision_types::ServerConfig;

use crate::error::AppResult;
use crate::modules::device_memory::InMemoryDeviceRepository;
use crate::modules::device_pg::PostgresDeviceRepository;
use crate::modules::repository::DeviceRepository;

/// PostgreSQL when `database_url` is set, else the devices file, else an empty store.
pub async fn open_device_store(config: &ServerConfig) -> AppResult<Arc<dyn DeviceRepository>> {
    if let Some(url) = &config.database_url {
        let repo = PostgresDeviceRepository::connect(url).await?;
        repo.run_migrations().await?;
        tracing::info!("🗄️ Using PostgreSQL device store");
        return Ok(Arc::new(repo));
    }

    if let Some(file) = &config.devices_file {
        let repo = InMemoryDeviceRepository::from_json_file(Path::new(file)).await?;
        return Ok(Arc::new(repo));
    }

    tracing::warn!("⚠️ No database_url or devices_file configured, device store is empty");
    Ok(Arc::new(InMemoryDeviceRepository::new()))
}
