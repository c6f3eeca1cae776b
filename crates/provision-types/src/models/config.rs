//! Server configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Full server configuration, loaded from JSON and overridden by CLI/env.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Port to listen on
    #[validate(range(min = 1_u16))]
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostgreSQL connection string; in-memory store when absent
    #[serde(default)]
    pub database_url: Option<String>,
    /// JSON file of device records seeding the in-memory store
    #[serde(default)]
    pub devices_file: Option<String>,
    /// Honor `X-Forwarded-For` / `X-Real-IP` when resolving the caller
    #[serde(default)]
    pub trust_forwarded_headers: bool,
    /// Admin API key; admin API disabled when absent
    #[serde(default)]
    pub api_key: Option<String>,
    /// Freshness gate settings
    #[serde(default)]
    #[validate(nested)]
    pub freshness: FreshnessConfig,
}

/// How old `updated_at` may be before a config is considered stale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct FreshnessConfig {
    /// Disable to serve configs regardless of age
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum age in days
    #[validate(range(min = 1_u32, max = 36500_u32))]
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            database_url: None,
            devices_file: None,
            trust_forwarded_headers: false,
            api_key: None,
            freshness: FreshnessConfig::default(),
        }
    }
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self { enabled: true, max_age_days: default_max_age_days() }
    }
}

impl ServerConfig {
    /// Get the full bind socket address.
    pub fn get_socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

pub const fn default_port() -> u16 {
    8045
}

pub const fn default_max_age_days() -> u32 {
    30
}

const fn default_true() -> bool {
    true
}
