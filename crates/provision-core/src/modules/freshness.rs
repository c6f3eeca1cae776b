//! Freshness policy over `updated_at`.
//!
//! A device that has not been touched for longer than the configured window
//! stops receiving its config until someone updates the record again.

use chrono::{DateTime, Duration, Utc};
use provision_types::{DeviceRecord, FreshnessConfig};
use std::sync::Arc;

pub trait FreshnessPolicy: Send + Sync {
    fn is_fresh_update(&self, device: &DeviceRecord, now: DateTime<Utc>) -> bool;
}

/// Fresh iff `now - updated_at <= max_age`. Timestamps in the future count
/// as fresh.
#[derive(Debug, Clone, Copy)]
pub struct WindowFreshness {
    max_age: Duration,
}

impl WindowFreshness {
    pub const fn new(max_age: Duration) -> Self {
        Self { max_age }
    }
}

impl FreshnessPolicy for WindowFreshness {
    fn is_fresh_update(&self, device: &DeviceRecord, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(device.updated_at) <= self.max_age
    }
}

/// Accepts every device.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFresh;

impl FreshnessPolicy for AlwaysFresh {
    fn is_fresh_update(&self, _device: &DeviceRecord, _now: DateTime<Utc>) -> bool {
        true
    }
}

/// Build the policy described by configuration.
pub fn policy_from_config(config: &FreshnessConfig) -> Arc<dyn FreshnessPolicy> {
    if config.enabled {
        Arc::new(WindowFreshness::new(Duration::days(i64::from(config.max_age_days))))
    } else {
        Arc::new(AlwaysFresh)
    }
}
