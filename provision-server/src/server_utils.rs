//! Listener setup and shutdown signals.

use anyhow::{Context, Result};
use listenfd::ListenFd;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use provision_types::ServerConfig;

const BACKLOG: i32 = 1024;

/// Socket handed over by the service manager, else a fresh `SO_REUSEPORT` bind.
pub async fn create_listener(config: &ServerConfig) -> Result<TcpListener> {
    if let Some(listener) = ListenFd::from_env().take_tcp_listener(0)? {
        info!("🔌 Listening on inherited socket");
        listener.set_nonblocking(true)?;
        return Ok(TcpListener::from_std(listener)?);
    }

    let ip: IpAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("bind_address '{}' is not an IP address", config.bind_address))?;
    bind_reuseport(SocketAddr::new(ip, config.port))
}

fn bind_reuseport(addr: SocketAddr) -> Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into()).with_context(|| format!("cannot bind {addr}"))?;
    socket.listen(BACKLOG)?;

    info!("🔌 Bound {}", addr);
    Ok(TcpListener::from_std(socket.into())?)
}

/// Resolves on Ctrl+C or SIGTERM.
#[allow(
    clippy::expect_used,
    reason = "Signal handlers are critical infrastructure, panic is appropriate on failure"
)]
pub async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        result = signal::ctrl_c() => {
            result.expect("failed to install Ctrl+C handler");
            "Ctrl+C"
        },
        () = terminate => "SIGTERM",
    };
    info!("🛑 {} received, draining connections", received);
}
