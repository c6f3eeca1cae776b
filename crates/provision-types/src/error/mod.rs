//! Typed error definitions for the provision server.
//!
//! - **`RuleViolation`** - why a device config was refused. Reported to the
//!   gate and to local diagnostics only; never to the requesting device.
//! - **`ConfigError`** - server configuration loading and validation.

mod config;
mod violation;

pub use config::ConfigError;
pub use violation::RuleViolation;
