//! Core domain models for the provision server.

mod config;
mod device;
mod request;
mod rules;
mod stats;

pub use config::{FreshnessConfig, ServerConfig};
pub use device::{DeviceRecord, SipAccount};
pub use request::{LookupDescriptor, RequestContext};
pub use rules::{DeviceRules, IpRule, TimeRule};
pub use stats::{ProvisionRequestLog, ProvisionStats};
