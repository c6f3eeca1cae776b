//! Request monitoring models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provisioning request statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProvisionStats {
    /// Total requests processed
    pub total_requests: u64,
    /// Requests answered with a config
    pub success_count: u64,
    /// Requests answered with 404
    pub error_count: u64,
    /// Failure counts keyed by reason
    #[serde(default)]
    pub by_reason: BTreeMap<String, u64>,
}

impl ProvisionStats {
    /// Calculate success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 100.0;
        }
        (self.success_count as f64 / self.total_requests as f64) * 100.0
    }
}

/// Individual provisioning request log entry.
///
/// `reason` is local diagnostics only and is never sent to the device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvisionRequestLog {
    /// Unique request ID
    pub id: String,
    /// Request timestamp (unix millis)
    pub timestamp: i64,
    /// Route name (`device` or `token`)
    pub route: String,
    /// Masked lookup identifier
    pub lookup: String,
    /// Hardware address from the filename, if it parsed
    pub requested_mac: Option<String>,
    /// Caller address
    pub remote_ip: String,
    /// Response status code
    pub status: u16,
    /// Failure reason
    pub reason: Option<String>,
    /// Device vendor on success
    pub vendor: Option<String>,
    /// Request duration in milliseconds
    pub duration: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let empty = ProvisionStats::default();
        assert!((empty.success_rate() - 100.0).abs() < f64::EPSILON);

        let stats = ProvisionStats {
            total_requests: 4,
            success_count: 1,
            error_count: 3,
            by_reason: BTreeMap::new(),
        };
        assert!((stats.success_rate() - 25.0).abs() < f64::EPSILON);
    }
}
