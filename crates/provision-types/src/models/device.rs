//! Provisioned device records.
//!
//! A `DeviceRecord` is written by the management surface and read by the
//! provisioning pipeline. Vendor-specific fields (timezone, NTP server, SIP
//! accounts) are only consumed by the config renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rules::{DeviceRules, IpRule};

/// One provisioned endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Storage identifier
    #[serde(default)]
    pub id: String,

    /// Master enable switch, disabled unless explicitly `true`
    #[serde(default)]
    pub status: bool,

    /// Opaque lookup key for `/v1/device/{key}/...`
    #[serde(default)]
    pub key: Option<String>,

    /// Lookup token for `/v1/token/{token}/...`
    #[serde(default)]
    pub token: Option<String>,

    /// Canonical hardware address of the device
    #[serde(default)]
    pub mac: Option<String>,

    /// Vendor name, selects the config template
    #[serde(default)]
    pub vendor: String,

    /// Vendor model name
    #[serde(default)]
    pub model: String,

    /// Timezone string passed through to the template
    #[serde(default)]
    pub timezone: Option<String>,

    /// NTP server passed through to the template
    #[serde(default)]
    pub ntp_server: Option<String>,

    /// SIP accounts, rendered by position
    #[serde(default)]
    pub accounts: Vec<SipAccount>,

    /// Optional access rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<DeviceRules>,

    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Last modification time, drives freshness
    pub updated_at: DateTime<Utc>,
}

/// SIP line configuration for one account slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SipAccount {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// 1-based line position on the device
    #[serde(default)]
    pub position: u32,
    /// SIP registrar host
    #[serde(default)]
    pub sip_register: String,
    /// SIP display/user name
    #[serde(default)]
    pub sip_name: String,
    /// SIP user id
    #[serde(default)]
    pub sip_user: String,
    /// SIP password
    #[serde(default)]
    pub sip_password: String,
    /// SIP authentication id
    #[serde(default)]
    pub sip_auth: String,
}

impl DeviceRecord {
    /// Instant of the time-until rule, if one is set.
    pub fn until_rule(&self) -> Option<DateTime<Utc>> {
        self.rules.as_ref()?.time.as_ref()?.until
    }

    /// Whether MAC binding is enforced.
    ///
    /// The `mac` key must be present and `true`; a present `false` is kept
    /// as "declared but disabled" and does not enforce.
    pub fn is_mac_rule(&self) -> bool {
        self.rules.as_ref().is_some_and(|rules| rules.mac == Some(true))
    }

    /// The IP rule, if one is set and non-empty.
    pub fn ip_rule(&self) -> Option<&IpRule> {
        self.rules.as_ref()?.ip.as_ref().filter(|rule| rule.is_set())
    }

    /// Copy with every SIP password masked, for logging.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for account in &mut copy.accounts {
            if !account.sip_password.is_empty() {
                account.sip_password = "***".to_string();
            }
        }
        copy
    }
}
