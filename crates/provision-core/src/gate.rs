//! Provisioning gate: lookup, verify, render.
//!
//! Both HTTP routes go through [`ProvisionGate::provision`]; they differ only
//! in how the device is looked up and whether the IP rule applies. Every
//! failure comes back as a [`GateError`] with the exact reason so it can be
//! logged, but callers facing the network must not reveal which one it was.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;

use provision_types::{LookupDescriptor, ProvisionRequestLog, RequestContext, RuleViolation};
use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::clock::{Clock, SystemClock};
use crate::modules::filename::parse_config_filename;
use crate::modules::freshness::FreshnessPolicy;
use crate::modules::repository::{DeviceRepository, RepositoryError};
use crate::monitor::ProvisionMonitor;
use crate::rules::{RuleEngine, RuleSet, VerifyEnv};
use crate::template::{ConfigRenderer, RenderError};

/// Which path a request came in on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionRoute {
    /// `/v1/device/{key}/{file}`
    Key(String),
    /// `/v1/token/{token}/{file}`
    Token(String),
}

impl ProvisionRoute {
    pub fn rule_set(&self) -> RuleSet {
        match self {
            Self::Key(_) => RuleSet::KEY_ROUTE,
            Self::Token(_) => RuleSet::TOKEN_ROUTE,
        }
    }

    /// The token route folds the requested mac into the lookup itself.
    pub fn lookup(&self, requested_mac: &str) -> LookupDescriptor {
        match self {
            Self::Key(key) => LookupDescriptor::Key { key: key.clone() },
            Self::Token(token) => {
                LookupDescriptor::Token { token: token.clone(), mac: requested_mac.to_string() }
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.lookup("").route()
    }
}

#[derive(Debug, Error)]
pub enum GateError {
    #[error("{0}")]
    Violation(#[from] RuleViolation),
    #[error("device lookup failed: {0}")]
    Lookup(#[from] RepositoryError),
    #[error("config render failed: {0}")]
    Render(#[from] RenderError),
}

impl GateError {
    /// Stable identifier for logs and monitor counters.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Violation(v) => v.as_str(),
            Self::Lookup(_) => "lookup_error",
            Self::Render(_) => "render_error",
        }
    }

    pub fn violation(&self) -> Option<RuleViolation> {
        match self {
            Self::Violation(v) => Some(*v),
            Self::Lookup(_) | Self::Render(_) => None,
        }
    }
}

/// Rendered config for an authorized device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedConfig {
    pub body: String,
    pub vendor: String,
}

pub struct ProvisionGate {
    repository: Arc<dyn DeviceRepository>,
    renderer: Arc<dyn ConfigRenderer>,
    freshness: Arc<dyn FreshnessPolicy>,
    clock: Arc<dyn Clock>,
    monitor: Option<Arc<ProvisionMonitor>>,
}

impl ProvisionGate {
    pub fn new(
        repository: Arc<dyn DeviceRepository>,
        renderer: Arc<dyn ConfigRenderer>,
        freshness: Arc<dyn FreshnessPolicy>,
    ) -> Self {
        Self { repository, renderer, freshness, clock: Arc::new(SystemClock), monitor: None }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_monitor(mut self, monitor: Arc<ProvisionMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn repository(&self) -> &Arc<dyn DeviceRepository> {
        &self.repository
    }

    /// Serve one config request.
    pub async fn provision(
        &self,
        route: &ProvisionRoute,
        file: &str,
        remote_ip: IpAddr,
    ) -> Result<ProvisionedConfig, GateError> {
        let started = Instant::now();
        let span = info_span!("provision", route = route.name(), remote_ip = %remote_ip);

        let requested_mac = parse_config_filename(file).ok().map(str::to_string);
        let result = self.run(route, file, remote_ip).instrument(span.clone()).await;

        span.in_scope(|| match &result {
            Ok(config) => info!(vendor = %config.vendor, "config served"),
            Err(GateError::Violation(RuleViolation::MalformedRequest)) => {
                debug!(file, "config refused: malformed filename");
            },
            Err(err @ GateError::Violation(_)) => {
                info!(reason = err.reason(), "config refused: {}", err);
            },
            Err(err) => warn!(reason = err.reason(), "config refused: {}", err),
        });

        if let Some(monitor) = &self.monitor {
            let lookup = route.lookup(requested_mac.as_deref().unwrap_or_default());
            monitor
                .log_request(ProvisionRequestLog {
                    id: uuid::Uuid::new_v4().to_string(),
                    timestamp: self.clock.now().timestamp_millis(),
                    route: route.name().to_string(),
                    lookup: lookup.masked_id(),
                    requested_mac,
                    remote_ip: remote_ip.to_string(),
                    status: if result.is_ok() { 200 } else { 404 },
                    reason: result.as_ref().err().map(|e| e.reason().to_string()),
                    vendor: result.as_ref().ok().map(|c| c.vendor.clone()),
                    duration: started.elapsed().as_millis() as u64,
                })
                .await;
        }

        result
    }

    async fn run(
        &self,
        route: &ProvisionRoute,
        file: &str,
        remote_ip: IpAddr,
    ) -> Result<ProvisionedConfig, GateError> {
        let requested_mac = parse_config_filename(file)?;
        let lookup = route.lookup(requested_mac);

        let device = self.repository.find_one(&lookup).await?;
        if let Some(found) = &device {
            debug!(device = ?found.redacted(), "device found");
        }

        let ctx = RequestContext::new(requested_mac, remote_ip);
        let env = VerifyEnv { now: self.clock.now(), freshness: self.freshness.as_ref() };
        let device = RuleEngine::new(route.rule_set()).verify(device.as_ref(), &ctx, &env)?;

        let body = self.renderer.render(device)?;
        Ok(ProvisionedConfig { body, vendor: device.vendor.clone() })
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod gate_tests;
