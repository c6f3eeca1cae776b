//! Request monitoring handlers

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;

use provision_types::{ProvisionRequestLog, ProvisionStats};

use crate::state::AppState;

#[derive(Deserialize)]
pub struct MonitorQuery {
    pub limit: Option<usize>,
}

pub async fn get_monitor_requests(
    State(state): State<AppState>,
    Query(query): Query<MonitorQuery>,
) -> Json<Vec<ProvisionRequestLog>> {
    Json(state.monitor().get_logs(query.limit).await)
}

pub async fn get_monitor_stats(State(state): State<AppState>) -> Json<ProvisionStats> {
    Json(state.monitor().get_stats().await)
}

pub async fn clear_monitor_logs(State(state): State<AppState>) -> Json<bool> {
    state.monitor().clear_logs().await;
    state.monitor().reset_stats().await;
    Json(true)
}
