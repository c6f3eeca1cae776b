//! Provision Server - Headless Daemon
//!
//! Serves per-device XML configs to auto-provisioning phones:
//! - `/v1/device/{key}/{file}` looks a device up by key
//! - `/v1/token/{token}/{file}` looks a device up by token and MAC
//! - `/api/*` exposes the request monitor and device store to operators
//!
//! Every refused config request is answered with an empty 404.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

mod api;
mod auth;
mod cli;
mod router;
mod server_utils;
mod state;

#[cfg(test)]
mod test_helpers;

use cli::{Cli, Commands};
use provision_core::modules::logger::init_logger;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli.log_level);

    let config = cli.resolve_config()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::ShowConfig { json } => {
            let mut shown = config.clone();
            if shown.api_key.is_some() {
                shown.api_key = Some("***".to_string());
            }
            if shown.database_url.is_some() {
                shown.database_url = Some("***".to_string());
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                println!("Bind:              {}", shown.get_socket_addr());
                println!("Database:          {}", shown.database_url.as_deref().unwrap_or("-"));
                println!("Devices file:      {}", shown.devices_file.as_deref().unwrap_or("-"));
                println!("Forwarded headers: {}", shown.trust_forwarded_headers);
                println!("Admin API:         {}", shown.api_key.is_some());
                println!(
                    "Freshness:         {} ({} days)",
                    shown.freshness.enabled, shown.freshness.max_age_days
                );
            }
            Ok(())
        },
        Commands::Serve => serve(config).await,
    }
}

async fn serve(config: provision_types::ServerConfig) -> Result<()> {
    info!("🚀 Provision Server starting on {}...", config.get_socket_addr());

    let listener = server_utils::create_listener(&config).await?;
    let state = AppState::from_config(config).await?;
    info!("✅ Application state initialized");

    let app = router::build_router(state);

    info!("🌐 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(server_utils::shutdown_signal())
        .await?;

    info!("👋 Server stopped");
    Ok(())
}
