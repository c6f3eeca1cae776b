//! Config download handlers for `/v1/device` and `/v1/token`.
//!
//! Whatever goes wrong, the phone only ever sees an empty 404.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use provision_core::ProvisionRoute;

use crate::state::AppState;

pub async fn handle_device_config(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Path((key, file)): Path<(String, String)>,
) -> Response {
    serve(&state, ProvisionRoute::Key(key), &file, peer, &headers).await
}

pub async fn handle_token_config(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Path((token, file)): Path<(String, String)>,
) -> Response {
    serve(&state, ProvisionRoute::Token(token), &file, peer, &headers).await
}

async fn serve(
    state: &AppState,
    route: ProvisionRoute,
    file: &str,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: &HeaderMap,
) -> Response {
    let remote_ip = client_ip(peer, headers, state.config().trust_forwarded_headers);

    match state.gate().provision(&route, file, remote_ip).await {
        Ok(config) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, "application/xml")], config.body)
                .into_response()
        },
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Socket peer, unless forwarded headers are trusted and carry a parseable address.
pub(crate) fn client_ip(
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: &HeaderMap,
    trust_forwarded: bool,
) -> IpAddr {
    if trust_forwarded {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());
        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<IpAddr>().ok())
        };
        if let Some(ip) = forwarded.or_else(real_ip) {
            return ip;
        }
    }

    peer.map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ConnectInfo(addr)| addr.ip())
}
