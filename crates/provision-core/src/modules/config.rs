//! Server configuration loading.

use std::fs;
use std::path::Path;
use validator::Validate;

use provision_types::{ConfigError, ServerConfig};

/// Load configuration from a JSON file.
///
/// A missing file yields defaults; a present but unreadable or invalid file
/// is an error.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(ServerConfig::default());
    };

    if !path.exists() {
        tracing::warn!("Config file {} not found, using defaults", path.display());
        return Ok(ServerConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::from_io_error(&e))?;
    let config: ServerConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate a fully assembled configuration (file + overrides).
pub fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.validate().map_err(|errors| {
        let field_errors = errors.field_errors();
        let field = field_errors
            .keys()
            .next()
            .map_or_else(|| "freshness".to_string(), |name| name.to_string());
        ConfigError::ValidationError { field, message: errors.to_string() }
    })?;

    if config.bind_address.parse::<std::net::IpAddr>().is_err() {
        return Err(ConfigError::ValidationError {
            field: "bind_address".to_string(),
            message: format!("'{}' is not an IP address", config.bind_address),
        });
    }
    Ok(())
}
