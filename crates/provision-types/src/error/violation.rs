//! Access rule violations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a device config request was refused.
///
/// Variants are listed in pipeline order: when several checks would fail,
/// the earliest one is reported.
#[derive(Debug, Clone, Copy, Error, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RuleViolation {
    /// Requested filename does not match `cfg<mac>.xml`
    #[error("malformed config filename")]
    MalformedRequest,

    /// No device matched the lookup descriptor
    #[error("no device config")]
    DeviceNotFound,

    /// Device exists but its status switch is off
    #[error("device config status disabled")]
    DeviceDisabled,

    /// `rules.time.until` is not strictly in the future
    #[error("device until time rule expired")]
    TimeRuleExpired,

    /// MAC binding is active and the requested address differs
    #[error("device mac is not valid")]
    MacRuleViolation,

    /// Caller address falls outside every configured range
    #[error("device ip is not valid")]
    IpRuleViolation,

    /// Device was last updated outside the freshness window
    #[error("device config expired")]
    StaleConfig,
}

impl RuleViolation {
    /// Stable identifier used in logs and monitor counters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedRequest => "malformed_request",
            Self::DeviceNotFound => "device_not_found",
            Self::DeviceDisabled => "device_disabled",
            Self::TimeRuleExpired => "time_rule_expired",
            Self::MacRuleViolation => "mac_rule_violation",
            Self::IpRuleViolation => "ip_rule_violation",
            Self::StaleConfig => "stale_config",
        }
    }
}
