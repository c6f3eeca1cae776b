//! Per-device access rules.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Optional constraints on when a device config may be served.
///
/// Each sub-rule activates independently. A device without `rules` is
/// restricted only by its status and freshness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DeviceRules {
    /// Hard expiry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeRule>,

    /// MAC binding flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<bool>,

    /// Allowed caller address ranges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpRule>,
}

/// Time-based rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TimeRule {
    /// Config is served only while `now < until`
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_until"
    )]
    pub until: Option<DateTime<Utc>>,
}

/// RFC 3339 timestamp, or a bare `YYYY-MM-DD` date meaning midnight UTC.
fn parse_until(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| format!("invalid until timestamp '{raw}'"))
}

fn deserialize_until<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_until(&raw).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// One or more address specifications: `10.0.0.1`, `10.0.0.0/8`,
/// `10.0.0.1-10.0.0.9`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IpRule {
    /// Single specification
    Single(String),
    /// List of specifications, any of which may match
    List(Vec<String>),
}

impl IpRule {
    /// Only an empty string counts as "no rule". Blank strings and empty
    /// lists are active rules that nothing can satisfy.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Single(spec) => !spec.is_empty(),
            Self::List(_) => true,
        }
    }

    /// Individual specifications.
    pub fn entries(&self) -> Vec<&str> {
        match self {
            Self::Single(spec) => vec![spec.as_str()],
            Self::List(specs) => specs.iter().map(String::as_str).collect(),
        }
    }
}
