//! Test helpers for provision-server unit tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use provision_core::modules::device_memory::InMemoryDeviceRepository;
use provision_core::FixedClock;
use provision_types::{DeviceRecord, ServerConfig};

use crate::router::build_router;
use crate::state::AppState;

pub const TEST_API_KEY: &str = "test-admin-key";

pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).single().expect("valid timestamp")
}

/// Enabled grandstream device updated at [`test_now`], merged with `extra`.
pub fn test_device(extra: serde_json::Value) -> DeviceRecord {
    let mut base = serde_json::json!({
        "id": "dev-1",
        "key": "key-1",
        "token": "tok-1",
        "mac": "aa:aa:aa:aa:aa:aa",
        "vendor": "grandstream",
        "model": "gxp1620",
        "status": true,
        "timezone": "Europe/Moscow",
        "ntp_server": "pool.ntp.org",
        "accounts": [{
            "name": "Reception",
            "position": 1,
            "sip_register": "sip.example.com",
            "sip_name": "Reception",
            "sip_user": "1001",
            "sip_password": "secret",
            "sip_auth": "1001"
        }],
        "updated_at": test_now()
    });
    if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(base).expect("valid device json")
}

/// `AppState` backed by an in-memory store and a clock frozen at [`test_now`].
///
/// Forwarded headers are trusted so tests can pick the caller address.
pub fn test_app_state(devices: Vec<DeviceRecord>) -> AppState {
    let config = ServerConfig {
        trust_forwarded_headers: true,
        api_key: Some(TEST_API_KEY.to_string()),
        ..ServerConfig::default()
    };
    AppState::new_with_components(
        config,
        Arc::new(InMemoryDeviceRepository::with_devices(devices)),
        Arc::new(FixedClock(test_now())),
    )
}

pub fn test_server(state: AppState) -> axum_test::TestServer {
    axum_test::TestServer::new(build_router(state)).expect("failed to build test server")
}
