use clap::{Parser, Subcommand};
use std::path::PathBuf;

use provision_core::modules::config::{load_config, validate_config};
use provision_types::{ConfigError, ServerConfig};

#[derive(Parser)]
#[command(
    name = "provision-server",
    about = "Provision Server - per-device XML configs for auto-provisioning phones",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, env = "PROVISION_CONFIG", help = "Path to JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, env = "PROVISION_PORT")]
    pub port: Option<u16>,

    #[arg(short, long, env = "PROVISION_BIND", help = "Bind address")]
    pub bind: Option<String>,

    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "PROVISION_DEVICES_FILE", help = "JSON file of device records")]
    pub devices_file: Option<PathBuf>,

    #[arg(long, env = "PROVISION_API_KEY", hide_env_values = true, help = "Admin API key")]
    pub api_key: Option<String>,

    #[arg(long, env = "PROVISION_FRESHNESS_DAYS", help = "Max config age in days")]
    pub freshness_days: Option<u32>,

    #[arg(long, help = "Trust X-Forwarded-For / X-Real-IP")]
    pub trust_forwarded_headers: bool,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Clone, Copy)]
pub enum Commands {
    #[command(about = "Start the provisioning server (default if no command specified)")]
    Serve,

    #[command(about = "Print the effective configuration")]
    ShowConfig {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },
}

impl Cli {
    /// Config file merged with command-line overrides.
    pub fn resolve_config(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = load_config(self.config.as_deref())?;

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind) = &self.bind {
            config.bind_address.clone_from(bind);
        }
        if let Some(url) = &self.database_url {
            config.database_url = Some(url.clone());
        }
        if let Some(file) = &self.devices_file {
            config.devices_file = Some(file.display().to_string());
        }
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(days) = self.freshness_days {
            config.freshness.max_age_days = days;
        }
        if self.trust_forwarded_headers {
            config.trust_forwarded_headers = true;
        }

        validate_config(&config)?;
        Ok(config)
    }
}
