//! Ordered access rule verification.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. device exists
//! 2. status switch is on
//! 3. `rules.time.until` lies strictly in the future
//! 4. MAC binding matches the requested filename
//! 5. caller address is inside `rules.ip` (key route only)
//! 6. `updated_at` is within the freshness window
//!
//! The engine never touches the record; on success it hands back the same
//! reference it was given.

use chrono::{DateTime, Utc};
use provision_types::{DeviceRecord, RequestContext, RuleViolation};

use crate::modules::freshness::FreshnessPolicy;
use crate::modules::ip_range::ip_rule_matches;

/// Which optional rules a route enforces. Status and freshness always apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    pub time: bool,
    pub mac: bool,
    pub ip: bool,
}

impl RuleSet {
    /// `/v1/device/{key}/{file}`
    pub const KEY_ROUTE: Self = Self { time: true, mac: true, ip: true };
    /// `/v1/token/{token}/{file}`
    pub const TOKEN_ROUTE: Self = Self { time: true, mac: true, ip: false };
}

/// Per-call dependencies of the engine.
#[derive(Clone, Copy)]
pub struct VerifyEnv<'a> {
    pub now: DateTime<Utc>,
    pub freshness: &'a dyn FreshnessPolicy,
}

#[derive(Debug, Clone, Copy)]
pub struct RuleEngine {
    rules: RuleSet,
}

impl RuleEngine {
    pub const fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Run the pipeline over a looked-up device.
    ///
    /// `None` means the lookup found nothing.
    pub fn verify<'d>(
        &self,
        device: Option<&'d DeviceRecord>,
        ctx: &RequestContext,
        env: &VerifyEnv<'_>,
    ) -> Result<&'d DeviceRecord, RuleViolation> {
        let device = device.ok_or(RuleViolation::DeviceNotFound)?;

        if !device.status {
            return Err(RuleViolation::DeviceDisabled);
        }

        if self.rules.time && is_expired_until_time_rule(device, env.now) {
            return Err(RuleViolation::TimeRuleExpired);
        }

        if self.rules.mac && device.is_mac_rule() && !is_valid_mac(device, &ctx.requested_mac) {
            return Err(RuleViolation::MacRuleViolation);
        }

        if self.rules.ip {
            if let Some(rule) = device.ip_rule() {
                if !ip_rule_matches(rule, ctx.remote_ip) {
                    return Err(RuleViolation::IpRuleViolation);
                }
            }
        }

        if !env.freshness.is_fresh_update(device, env.now) {
            return Err(RuleViolation::StaleConfig);
        }

        Ok(device)
    }
}

/// Expired when `until - now <= 0`; the boundary instant itself is expired.
fn is_expired_until_time_rule(device: &DeviceRecord, now: DateTime<Utc>) -> bool {
    device.until_rule().is_some_and(|until| until <= now)
}

fn is_valid_mac(device: &DeviceRecord, requested: &str) -> bool {
    device.mac.as_deref().is_some_and(|mac| !mac.is_empty() && mac == requested)
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
