#![allow(clippy::unwrap_used, reason = "test assertions")]

use chrono::{DateTime, Duration, TimeZone, Utc};
use provision_types::{DeviceRecord, DeviceRules, IpRule, RequestContext, RuleViolation, TimeRule};

use super::{RuleEngine, RuleSet, VerifyEnv};
use crate::modules::freshness::{FreshnessPolicy, WindowFreshness};

struct Fixed(bool);

impl FreshnessPolicy for Fixed {
    fn is_fresh_update(&self, _device: &DeviceRecord, _now: DateTime<Utc>) -> bool {
        self.0
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

fn device(rules: Option<DeviceRules>) -> DeviceRecord {
    DeviceRecord {
        id: "dev-1".to_string(),
        status: true,
        key: Some("key-1".to_string()),
        token: None,
        mac: Some("aa:aa:aa:aa:aa:aa".to_string()),
        vendor: "grandstream".to_string(),
        model: "gxp1600".to_string(),
        timezone: None,
        ntp_server: None,
        accounts: Vec::new(),
        rules,
        created_at: None,
        updated_at: now(),
    }
}

fn ctx(mac: &str, ip: &str) -> RequestContext {
    RequestContext::new(mac, ip.parse().unwrap())
}

fn verify(
    rules: RuleSet,
    device: &DeviceRecord,
    ctx: &RequestContext,
) -> Result<(), RuleViolation> {
    let env = VerifyEnv { now: now(), freshness: &Fixed(true) };
    RuleEngine::new(rules).verify(Some(device), ctx, &env).map(|_| ())
}

fn mac_rule() -> Option<DeviceRules> {
    Some(DeviceRules { mac: Some(true), ..DeviceRules::default() })
}

fn ip_rule(rule: IpRule) -> Option<DeviceRules> {
    Some(DeviceRules { ip: Some(rule), ..DeviceRules::default() })
}

fn until_rule(until: DateTime<Utc>) -> Option<DeviceRules> {
    Some(DeviceRules { time: Some(TimeRule { until: Some(until) }), ..DeviceRules::default() })
}

#[test]
fn test_missing_device_is_not_found() {
    let env = VerifyEnv { now: now(), freshness: &Fixed(true) };
    let result = RuleEngine::new(RuleSet::KEY_ROUTE).verify(None, &ctx("", "10.0.0.1"), &env);
    assert_eq!(result.unwrap_err(), RuleViolation::DeviceNotFound);
}

#[test]
fn test_success_returns_same_reference() {
    let dev = device(None);
    let env = VerifyEnv { now: now(), freshness: &Fixed(true) };
    let result = RuleEngine::new(RuleSet::KEY_ROUTE)
        .verify(Some(&dev), &ctx("", "10.0.0.1"), &env)
        .unwrap();
    assert!(std::ptr::eq(result, &dev));
}

#[test]
fn test_disabled_wins_over_everything() {
    let mut rules = DeviceRules {
        time: Some(TimeRule { until: Some(now() - Duration::days(1)) }),
        mac: Some(true),
        ip: Some(IpRule::Single("10.0.0.1".to_string())),
    };
    let mut dev = device(Some(rules.clone()));
    dev.status = false;

    let env = VerifyEnv { now: now(), freshness: &Fixed(false) };
    let result = RuleEngine::new(RuleSet::KEY_ROUTE).verify(
        Some(&dev),
        &ctx("bb:bb:bb:bb:bb:bb", "192.168.1.1"),
        &env,
    );
    assert_eq!(result.unwrap_err(), RuleViolation::DeviceDisabled);

    rules.time = None;
    dev.rules = Some(rules);
    assert_eq!(
        verify(RuleSet::TOKEN_ROUTE, &dev, &ctx("x", "10.0.0.1")).unwrap_err(),
        RuleViolation::DeviceDisabled
    );
}

#[test]
fn test_disabled_and_mac_mismatch_reports_disabled() {
    let mut dev = device(mac_rule());
    dev.status = false;
    assert_eq!(
        verify(RuleSet::KEY_ROUTE, &dev, &ctx("aa:aa:aa:aa:aa:bb", "10.0.0.1")).unwrap_err(),
        RuleViolation::DeviceDisabled
    );
}

#[test]
fn test_until_in_past_is_expired() {
    let dev = device(until_rule(now() - Duration::seconds(1)));
    assert_eq!(
        verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "10.0.0.1")).unwrap_err(),
        RuleViolation::TimeRuleExpired
    );
}

#[test]
fn test_until_at_now_is_expired() {
    let dev = device(until_rule(now()));
    assert_eq!(
        verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "10.0.0.1")).unwrap_err(),
        RuleViolation::TimeRuleExpired
    );
}

#[test]
fn test_until_in_future_passes() {
    let dev = device(until_rule(now() + Duration::seconds(1)));
    assert!(verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "10.0.0.1")).is_ok());
    assert!(verify(RuleSet::TOKEN_ROUTE, &dev, &ctx("", "10.0.0.1")).is_ok());
}

#[test]
fn test_expired_until_checked_before_mac() {
    let mut rules = until_rule(now() - Duration::days(3)).unwrap();
    rules.mac = Some(true);
    let dev = device(Some(rules));
    assert_eq!(
        verify(RuleSet::KEY_ROUTE, &dev, &ctx("zz", "10.0.0.1")).unwrap_err(),
        RuleViolation::TimeRuleExpired
    );
}

#[test]
fn test_mac_rule_exact_match() {
    let dev = device(mac_rule());
    assert!(verify(RuleSet::KEY_ROUTE, &dev, &ctx("aa:aa:aa:aa:aa:aa", "10.0.0.1")).is_ok());
    assert_eq!(
        verify(RuleSet::KEY_ROUTE, &dev, &ctx("aa:aa:aa:aa:aa:bb", "10.0.0.1")).unwrap_err(),
        RuleViolation::MacRuleViolation
    );
}

#[test]
fn test_mac_rule_is_case_sensitive() {
    let dev = device(mac_rule());
    assert_eq!(
        verify(RuleSet::TOKEN_ROUTE, &dev, &ctx("AA:AA:AA:AA:AA:AA", "10.0.0.1")).unwrap_err(),
        RuleViolation::MacRuleViolation
    );
}

#[test]
fn test_mac_rule_without_stored_mac_fails() {
    let mut dev = device(mac_rule());
    dev.mac = None;
    assert_eq!(
        verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "10.0.0.1")).unwrap_err(),
        RuleViolation::MacRuleViolation
    );
}

#[test]
fn test_mac_rule_declared_false_is_inactive() {
    let dev = device(Some(DeviceRules { mac: Some(false), ..DeviceRules::default() }));
    assert!(verify(RuleSet::KEY_ROUTE, &dev, &ctx("something-else", "10.0.0.1")).is_ok());
}

#[test]
fn test_ip_rule_single_address() {
    let dev = device(ip_rule(IpRule::Single("192.168.200.1".to_string())));
    assert!(verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "192.168.200.1")).is_ok());
    assert_eq!(
        verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "192.168.200.2")).unwrap_err(),
        RuleViolation::IpRuleViolation
    );
}

#[test]
fn test_ip_rule_list_any_match() {
    let dev = device(ip_rule(IpRule::List(vec![
        "10.0.0.0/8".to_string(),
        "192.168.1.10-192.168.1.20".to_string(),
    ])));
    assert!(verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "10.20.30.40")).is_ok());
    assert!(verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "192.168.1.15")).is_ok());
    assert_eq!(
        verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "192.168.1.21")).unwrap_err(),
        RuleViolation::IpRuleViolation
    );
}

#[test]
fn test_ip_rule_empty_list_rejects() {
    let dev = device(ip_rule(IpRule::List(Vec::new())));
    assert_eq!(
        verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "10.0.0.1")).unwrap_err(),
        RuleViolation::IpRuleViolation
    );
}

#[test]
fn test_ip_rule_blank_string_rejects() {
    let dev = device(ip_rule(IpRule::Single("   ".to_string())));
    assert_eq!(
        verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "8.8.8.8")).unwrap_err(),
        RuleViolation::IpRuleViolation
    );
}

#[test]
fn test_ip_rule_empty_string_is_inactive() {
    let dev = device(ip_rule(IpRule::Single(String::new())));
    assert!(verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "8.8.8.8")).is_ok());
}

#[test]
fn test_mac_checked_before_ip() {
    let dev = device(Some(DeviceRules {
        mac: Some(true),
        ip: Some(IpRule::Single("192.168.200.1".to_string())),
        ..DeviceRules::default()
    }));
    assert_eq!(
        verify(RuleSet::KEY_ROUTE, &dev, &ctx("aa:aa:aa:aa:aa:bb", "192.168.200.2")).unwrap_err(),
        RuleViolation::MacRuleViolation
    );
}

#[test]
fn test_expired_until_checked_before_ip() {
    let mut rules = until_rule(now() - Duration::hours(1)).unwrap();
    rules.ip = Some(IpRule::Single("192.168.200.1".to_string()));
    let dev = device(Some(rules));
    assert_eq!(
        verify(RuleSet::KEY_ROUTE, &dev, &ctx("", "192.168.200.2")).unwrap_err(),
        RuleViolation::TimeRuleExpired
    );
}

#[test]
fn test_token_route_ignores_ip_rule() {
    let dev = device(ip_rule(IpRule::Single("192.168.200.1".to_string())));
    assert!(verify(RuleSet::TOKEN_ROUTE, &dev, &ctx("", "192.168.200.2")).is_ok());
}

#[test]
fn test_ip_checked_before_freshness() {
    let dev = device(ip_rule(IpRule::Single("192.168.200.1".to_string())));
    let env = VerifyEnv { now: now(), freshness: &Fixed(false) };
    let result =
        RuleEngine::new(RuleSet::KEY_ROUTE).verify(Some(&dev), &ctx("", "192.168.200.2"), &env);
    assert_eq!(result.unwrap_err(), RuleViolation::IpRuleViolation);
}

#[test]
fn test_stale_device_rejected() {
    let mut dev = device(None);
    dev.updated_at = Utc.with_ymd_and_hms(2019, 1, 18, 15, 41, 15).unwrap();
    let freshness = WindowFreshness::new(Duration::days(30));
    let env = VerifyEnv { now: now(), freshness: &freshness };
    let result = RuleEngine::new(RuleSet::KEY_ROUTE).verify(Some(&dev), &ctx("", "10.0.0.1"), &env);
    assert_eq!(result.unwrap_err(), RuleViolation::StaleConfig);

    dev.updated_at = now();
    assert!(RuleEngine::new(RuleSet::KEY_ROUTE).verify(Some(&dev), &ctx("", "10.0.0.1"), &env).is_ok());
}

#[test]
fn test_unrestricted_device_passes_any_context() {
    let dev = device(Some(DeviceRules::default()));
    assert!(verify(RuleSet::KEY_ROUTE, &dev, &ctx("whatever", "::1")).is_ok());
}
