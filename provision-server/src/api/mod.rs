//! API Routes
//!
//! `provision` serves the phones; everything under `/api` is the admin surface.

mod devices;
mod monitor;
pub mod provision;


use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // Monitor
        .route("/monitor/requests", get(monitor::get_monitor_requests))
        .route("/monitor/stats", get(monitor::get_monitor_stats))
        .route("/monitor/clear", post(monitor::clear_monitor_logs))
        // Devices
        .route("/devices", get(devices::list_devices).put(devices::upsert_device))
}
