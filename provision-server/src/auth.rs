//! Admin API authentication.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::state::AppState;

/// Require the configured API key on `/api/*`.
///
/// Without a configured key the admin API does not exist.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = state.config().api_key.as_deref().filter(|k| !k.is_empty()) else {
        return Err(StatusCode::NOT_FOUND);
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .or_else(|| request.headers().get("x-api-key").and_then(|h| h.to_str().ok()));

    match provided {
        Some(key) if constant_time_compare(key.trim(), expected) => Ok(next.run(request).await),
        _ => {
            tracing::warn!("Rejected admin request to {}", request.uri().path());
            Err(StatusCode::UNAUTHORIZED)
        },
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
