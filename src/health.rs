//! Delivery health tracking and the reconnection trigger.
//!
//! One [`HealthMonitor`] lives for the whole run. It counts consecutive
//! cycle failures against the reconnection threshold, keeps the monotonic
//! sent/dropped counters, and emits a periodic aggregate ratio line.

use std::time::{Duration, Instant};

use tracing::info;

/// Interval between aggregate delivery reports.
const REPORT_INTERVAL: Duration = Duration::from_secs(10);

/// Link health as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Consecutive failures are below the reconnection threshold.
    Healthy,
    /// The threshold was crossed; reconnection is in progress.
    Recovering,
}

/// Tracks cycle failures and delivery counters for one sender run.
pub struct HealthMonitor {
    consecutive_failures: u32,
    reconnect_threshold: u32,
    packets_sent: u64,
    packets_dropped: u64,
    reconnects: u32,
    state: LinkState,
    last_report: Instant,
}

impl HealthMonitor {
    pub fn new(reconnect_threshold: u32) -> Self {
        Self {
            consecutive_failures: 0,
            reconnect_threshold,
            packets_sent: 0,
            packets_dropped: 0,
            reconnects: 0,
            state: LinkState::Healthy,
            last_report: Instant::now(),
        }
    }

    /// Record a cycle that ran to completion; resets the failure streak.
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.state = LinkState::Healthy;
    }

    /// Record a cycle failure. Returns `true` when the streak reaches the
    /// reconnection threshold, which the caller must answer by reconnecting
    /// before the next cycle.
    pub fn record_cycle_failure(&mut self) -> bool {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= self.reconnect_threshold {
            self.state = LinkState::Recovering;
            true
        } else {
            false
        }
    }

    /// Mark the start of reconnection. The counter resets here, not at the
    /// end, so a failure during reconnection itself does not immediately
    /// re-trigger it on the next cycle.
    pub fn begin_reconnect(&mut self) {
        self.consecutive_failures = 0;
        self.reconnects += 1;
    }

    /// Mark reconnection complete. Restores `Healthy` unconditionally;
    /// whether the underlying reconnect calls succeeded is not its concern.
    pub fn finish_reconnect(&mut self) {
        self.state = LinkState::Healthy;
    }

    pub fn record_sent(&mut self) {
        self.packets_sent += 1;
    }

    pub fn record_dropped(&mut self) {
        self.packets_dropped += 1;
    }

    /// Emit the aggregate delivery line if the report interval has elapsed.
    pub fn report_if_due(&mut self) {
        if self.last_report.elapsed() < REPORT_INTERVAL {
            return;
        }
        let attempted = self.packets_sent + self.packets_dropped;
        let drop_ratio = if attempted == 0 {
            0.0
        } else {
            self.packets_dropped as f64 / attempted as f64
        };
        info!(
            sent = self.packets_sent,
            dropped = self.packets_dropped,
            drop_ratio,
            reconnects = self.reconnects,
            "delivery report"
        );
        self.last_report = Instant::now();
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    pub fn packets_dropped(&self) -> u64 {
        self.packets_dropped
    }

    pub fn reconnects(&self) -> u32 {
        self.reconnects
    }
}
