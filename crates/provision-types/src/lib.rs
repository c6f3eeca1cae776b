//! # Provision Types
//!
//! Core types, models, and error definitions for the provision server.
//!
//! - **`error`** - Rule violations and configuration errors
//! - **`models`** - Device records, access rules, request context, server config
//!
//! ## Architecture Role
//!
//! `provision-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!          provision-types (this crate)
//!                  │
//!                  ▼
//!           provision-core
//!                  │
//!                  ▼
//!          provision-server
//! ```
//!
//! Nothing in this crate performs I/O. Every type is serializable so it can
//! travel through the device store, the admin API, and the request monitor.

pub mod error;
pub mod models;

pub use error::{ConfigError, RuleViolation};

pub use models::{
    DeviceRecord, DeviceRules, FreshnessConfig, IpRule, LookupDescriptor, ProvisionRequestLog,
    ProvisionStats, RequestContext, ServerConfig, SipAccount, TimeRule,
};
