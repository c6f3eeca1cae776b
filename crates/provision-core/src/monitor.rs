//! Provisioning request monitoring.
//!
//! Records one entry per request, including the precise failure reason
//! that the HTTP response deliberately hides. Entries stay in-process and
//! are only exposed through the admin API.
#![allow(clippy::arithmetic_side_effects, reason = "counter increments")]

pub use provision_types::{ProvisionRequestLog, ProvisionStats};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Sink for request log entries (log shipping, websocket push, ...).
pub trait ProvisionEventBus: Send + Sync {
    fn emit_request_log(&self, log: &ProvisionRequestLog);
}

/// A no-op event bus for headless mode
pub struct NoopEventBus;

impl ProvisionEventBus for NoopEventBus {
    fn emit_request_log(&self, _log: &ProvisionRequestLog) {}
}

pub struct ProvisionMonitor {
    enabled: AtomicBool,
    stats: RwLock<ProvisionStats>,
    event_bus: Arc<dyn ProvisionEventBus>,
    logs: RwLock<VecDeque<ProvisionRequestLog>>,
    max_logs: usize,
}

impl ProvisionMonitor {
    pub fn new() -> Self {
        Self::with_event_bus(Arc::new(NoopEventBus))
    }

    pub fn with_event_bus(event_bus: Arc<dyn ProvisionEventBus>) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            stats: RwLock::new(ProvisionStats::default()),
            event_bus,
            logs: RwLock::new(VecDeque::with_capacity(1024)),
            max_logs: 1000,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub async fn log_request(&self, log: ProvisionRequestLog) {
        if !self.is_enabled() {
            return;
        }

        {
            let mut stats = self.stats.write().await;
            stats.total_requests += 1;
            if log.status >= 400 {
                stats.error_count += 1;
            } else {
                stats.success_count += 1;
            }
            if let Some(reason) = &log.reason {
                *stats.by_reason.entry(reason.clone()).or_insert(0) += 1;
            }
        }

        self.event_bus.emit_request_log(&log);

        {
            let mut logs = self.logs.write().await;
            if logs.len() >= self.max_logs {
                let excess = logs.len() - self.max_logs + 1;
                logs.drain(..excess);
            }
            logs.push_back(log);
        }
    }

    pub async fn get_stats(&self) -> ProvisionStats {
        self.stats.read().await.clone()
    }

    /// Most recent entries first.
    pub async fn get_logs(&self, limit: Option<usize>) -> Vec<ProvisionRequestLog> {
        let logs = self.logs.read().await;
        let limit = limit.unwrap_or(logs.len());
        logs.iter().rev().take(limit).cloned().collect()
    }

    pub async fn clear_logs(&self) {
        let mut logs = self.logs.write().await;
        logs.clear();
    }

    pub async fn reset_stats(&self) {
        let mut stats = self.stats.write().await;
        *stats = ProvisionStats::default();
    }
}

impl Default for ProvisionMonitor {
    fn default() -> Self {
        Self::new()
    }
}
