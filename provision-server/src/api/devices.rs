//! Device management handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use provision_core::modules::repository::RepositoryError;
use provision_types::DeviceRecord;

use crate::state::AppState;

/// Every stored device, with SIP passwords masked.
pub async fn list_devices(State(state): State<AppState>) -> Response {
    match state.repository().list_devices().await {
        Ok(devices) => {
            let devices: Vec<DeviceRecord> = devices.iter().map(DeviceRecord::redacted).collect();
            Json(devices).into_response()
        },
        Err(e) => error_response(&e),
    }
}

pub async fn upsert_device(
    State(state): State<AppState>,
    Json(device): Json<DeviceRecord>,
) -> Response {
    let id = device.id.clone();
    match state.repository().upsert_device(device).await {
        Ok(saved) => {
            tracing::info!("📝 Device {} saved", id);
            Json(saved.redacted()).into_response()
        },
        Err(e) => error_response(&e),
    }
}

fn error_response(e: &RepositoryError) -> Response {
    let status = match e {
        RepositoryError::Invalid(_) => StatusCode::BAD_REQUEST,
        RepositoryError::Database(_) | RepositoryError::Serialization(_) => {
            tracing::error!("Device store error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        },
    };
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}
