//! Caller address matching for `rules.ip`.
//!
//! Each entry is one of:
//! - a single address: `192.168.200.1`, `fe80::1`
//! - a CIDR block: `10.0.0.0/8`
//! - an inclusive range: `192.168.1.10-192.168.1.20`

use ipnet::IpNet;
use provision_types::IpRule;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ip range spec '{spec}'")]
pub struct IpRangeParseError {
    pub spec: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpRangeSpec {
    Addr(IpAddr),
    Net(IpNet),
    Range(IpAddr, IpAddr),
}

impl FromStr for IpRangeSpec {
    type Err = IpRangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        let invalid = || IpRangeParseError { spec: s.to_string() };

        if spec.contains('/') {
            return spec.parse::<IpNet>().map(Self::Net).map_err(|_| invalid());
        }

        if let Some((start, end)) = spec.split_once('-') {
            let start = normalize(start.trim().parse::<IpAddr>().map_err(|_| invalid())?);
            let end = normalize(end.trim().parse::<IpAddr>().map_err(|_| invalid())?);
            if start.is_ipv4() != end.is_ipv4() || start > end {
                return Err(invalid());
            }
            return Ok(Self::Range(start, end));
        }

        spec.parse::<IpAddr>().map(|ip| Self::Addr(normalize(ip))).map_err(|_| invalid())
    }
}

impl IpRangeSpec {
    pub fn contains(&self, ip: IpAddr) -> bool {
        let ip = normalize(ip);
        match self {
            Self::Addr(addr) => *addr == ip,
            Self::Net(net) => net.contains(&ip),
            Self::Range(start, end) => {
                start.is_ipv4() == ip.is_ipv4() && *start <= ip && ip <= *end
            },
        }
    }
}

/// Unwrap IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`), which is how a
/// dual-stack listener reports IPv4 peers.
pub fn normalize(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(ip, IpAddr::V4),
        IpAddr::V4(_) => ip,
    }
}

/// True when `ip` falls inside at least one entry of `rule`.
pub fn ip_rule_matches(rule: &IpRule, ip: IpAddr) -> bool {
    rule.entries().into_iter().any(|entry| match entry.parse::<IpRangeSpec>() {
        Ok(spec) => spec.contains(ip),
        Err(err) => {
            tracing::warn!("Ignoring {}", err);
            false
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_single_address() {
        let spec: IpRangeSpec = "192.168.200.1".parse().unwrap();
        assert!(spec.contains(ip("192.168.200.1")));
        assert!(!spec.contains(ip("192.168.200.2")));
    }

    #[test]
    fn test_cidr_block() {
        let spec: IpRangeSpec = "10.0.0.0/8".parse().unwrap();
        assert!(spec.contains(ip("10.255.0.1")));
        assert!(!spec.contains(ip("11.0.0.1")));

        let v6: IpRangeSpec = "2001:db8::/32".parse().unwrap();
        assert!(v6.contains(ip("2001:db8::42")));
        assert!(!v6.contains(ip("10.0.0.1")));
    }

    #[test]
    fn test_inclusive_range() {
        let spec: IpRangeSpec = "192.168.1.10 - 192.168.1.20".parse().unwrap();
        assert!(spec.contains(ip("192.168.1.10")));
        assert!(spec.contains(ip("192.168.1.20")));
        assert!(!spec.contains(ip("192.168.1.21")));
        assert!(!spec.contains(ip("::1")));
    }

    #[test]
    fn test_mapped_ipv4_caller() {
        let spec: IpRangeSpec = "192.168.200.1".parse().unwrap();
        assert!(spec.contains(ip("::ffff:192.168.200.1")));
    }

    #[test]
    fn test_invalid_specs() {
        assert!("not-an-ip".parse::<IpRangeSpec>().is_err());
        assert!("10.0.0.0/40".parse::<IpRangeSpec>().is_err());
        assert!("10.0.0.9-10.0.0.1".parse::<IpRangeSpec>().is_err());
        assert!("10.0.0.1-::1".parse::<IpRangeSpec>().is_err());
    }

    #[test]
    fn test_rule_skips_invalid_entries() {
        let rule = IpRule::List(vec!["garbage".to_string(), "172.16.0.0/12".to_string()]);
        assert!(ip_rule_matches(&rule, ip("172.16.5.5")));
        assert!(!ip_rule_matches(&rule, ip("8.8.8.8")));
    }
}
