//! Per-request inputs to the provisioning pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// What the rule engine knows about the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Text captured between `cfg` and `.xml` in the requested filename
    pub requested_mac: String,
    /// Caller network address
    pub remote_ip: IpAddr,
}

impl RequestContext {
    pub fn new(requested_mac: impl Into<String>, remote_ip: IpAddr) -> Self {
        Self { requested_mac: requested_mac.into(), remote_ip }
    }
}

/// Identifying values used to resolve a device record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum LookupDescriptor {
    /// Lookup by opaque key alone
    Key { key: String },
    /// Lookup by token and hardware address jointly
    Token { token: String, mac: String },
}

impl LookupDescriptor {
    /// Route name used in logs.
    pub fn route(&self) -> &'static str {
        match self {
            Self::Key { .. } => "device",
            Self::Token { .. } => "token",
        }
    }

    /// Identifier truncated to a short prefix so full secrets never reach
    /// the logs.
    pub fn masked_id(&self) -> String {
        let id = match self {
            Self::Key { key } => key,
            Self::Token { token, .. } => token,
        };
        let prefix: String = id.chars().take(4).collect();
        if id.chars().count() > 4 {
            format!("{}…", prefix)
        } else {
            prefix
        }
    }
}

impl fmt::Display for LookupDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.route(), self.masked_id())
    }
}
