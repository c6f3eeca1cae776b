//! # Provision Core
//!
//! Business logic for serving device configs to auto-provisioning endpoints.
//!
//! ```text
//! provision-core/src/
//! ├── rules.rs          # Ordered rule verification engine
//! ├── gate.rs           # Lookup -> verify -> render orchestration
//! ├── monitor.rs        # Request log ring buffer + stats
//! ├── clock.rs          # Injectable "now"
//! ├── template/         # Vendor XML renderers
//! └── modules/          # Filename parsing, IP ranges, freshness,
//!                       # device repositories, store selection, config, logging
//! ```
//!
//! The HTTP layer lives in `provision-server`; nothing here depends on axum.

#![cfg_attr(
    test,
    allow(clippy::panic, clippy::print_stdout, clippy::assertions_on_result_states)
)]

pub mod clock;
pub mod error;
pub mod gate;
pub mod modules;
pub mod monitor;
pub mod rules;
pub mod template;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AppError, AppResult};
pub use gate::{GateError, ProvisionGate, ProvisionRoute};
pub use monitor::{NoopEventBus, ProvisionEventBus, ProvisionMonitor};
pub use rules::{RuleEngine, RuleSet, VerifyEnv};
