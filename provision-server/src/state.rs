//! Application State
//!
//! Holds the provisioning gate and everything the admin API reads.

use anyhow::Result;
use std::sync::Arc;

use provision_core::modules::freshness::policy_from_config;
use provision_core::modules::repository::DeviceRepository;
use provision_core::modules::store::open_device_store;
use provision_core::template::TemplateRenderer;
use provision_core::{Clock, ProvisionGate, ProvisionMonitor, SystemClock};
use provision_types::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub(crate) inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub config: ServerConfig,
    pub gate: ProvisionGate,
    pub monitor: Arc<ProvisionMonitor>,
    pub repository: Arc<dyn DeviceRepository>,
}

impl AppState {
    /// Open the configured device store and assemble the gate.
    pub async fn from_config(config: ServerConfig) -> Result<Self> {
        let repository = open_device_store(&config).await?;
        Ok(Self::new_with_components(config, repository, Arc::new(SystemClock)))
    }

    /// Create AppState with pre-built components (tests, embedding)
    pub fn new_with_components(
        config: ServerConfig,
        repository: Arc<dyn DeviceRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let monitor = Arc::new(ProvisionMonitor::new());
        let gate = ProvisionGate::new(
            repository.clone(),
            Arc::new(TemplateRenderer::new()),
            policy_from_config(&config.freshness),
        )
        .with_clock(clock)
        .with_monitor(monitor.clone());

        Self { inner: Arc::new(AppStateInner { config, gate, monitor, repository }) }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    pub fn gate(&self) -> &ProvisionGate {
        &self.inner.gate
    }

    pub fn monitor(&self) -> &Arc<ProvisionMonitor> {
        &self.inner.monitor
    }

    pub fn repository(&self) -> &Arc<dyn DeviceRepository> {
        &self.inner.repository
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_helpers::test_device;

    #[tokio::test]
    async fn test_from_config_loads_devices_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("devices.json");
        let devices = vec![test_device(serde_json::json!({}))];
        std::fs::write(&path, serde_json::to_string(&devices).unwrap()).unwrap();

        let config = ServerConfig {
            devices_file: Some(path.display().to_string()),
            ..ServerConfig::default()
        };
        let state = AppState::from_config(config).await.unwrap();

        let listed = state.repository().list_devices().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key.as_deref(), Some("key-1"));
    }
}
