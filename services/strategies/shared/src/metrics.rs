//! Strategy metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Snapshot of a [`MetricsCollector`] at a point in time.
#[derive(Debug, Clone, Default)]
pub struct StrategyMetrics {
    pub messages_processed: u64,
    pub signals_generated: u64,
    pub trades_executed: u64,
    pub errors: u64,
}

/// Thread-safe running counters a [`crate::endpoint::StrategyEndpoint`]
/// updates as it drives a handler.
#[derive(Debug)]
pub struct MetricsCollector {
    start_time: Instant,
    messages_processed: AtomicU64,
    signals_generated: AtomicU64,
    trades_executed: AtomicU64,
    errors: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            messages_processed: AtomicU64::new(0),
            signals_generated: AtomicU64::new(0),
            trades_executed: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    pub fn increment_messages(&self) {
        self.messages_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_signals(&self) {
        self.signals_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_trades(&self) {
        self.trades_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_metrics(&self) -> StrategyMetrics {
        StrategyMetrics {
            messages_processed: self.messages_processed.load(Ordering::Relaxed),
            signals_generated: self.signals_generated.load(Ordering::Relaxed),
            trades_executed: self.trades_executed.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
