//! Metrics collection for system monitoring
//!
//! Lock-free metrics counters using atomic operations.
//! Collected in hot path, exported via API in cold path.

use crate::hot_path::{FieldOutcome, RejectReason};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Instant, SystemTime};

/// System metrics collector
///
/// Thread-safe counters updated from hot path.
/// Snapshots taken for API export.
pub struct MetricsCollector {
    /// Frames received from the stream (any kind)
    messages: AtomicU64,
    /// bookTicker-looking frames that failed to decode
    decode_failures: AtomicU64,
    /// Price fields stored in the table
    merged: AtomicU64,
    /// Empty price fields
    skipped: AtomicU64,
    rejected_parse: AtomicU64,
    rejected_non_positive: AtomicU64,
    rejected_unknown_symbol: AtomicU64,
    /// Evaluations that produced a ratio
    computed: AtomicU64,
    /// Evaluations with a missing leg
    incomplete: AtomicU64,
    /// Reconnect attempts
    reconnects: AtomicU64,
    connected: AtomicBool,
    /// Last message timestamp (Unix millis)
    last_message_time: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

/// Metrics snapshot for API export
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub messages: u64,
    pub decode_failures: u64,
    pub merged: u64,
    pub skipped: u64,
    pub rejected_parse: u64,
    pub rejected_non_positive: u64,
    pub rejected_unknown_symbol: u64,
    pub computed: u64,
    pub incomplete: u64,
    pub reconnects: u64,
    pub connected: bool,
    pub message_rate: f64, // messages per second
    pub uptime_seconds: u64,
}

impl MetricsCollector {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            messages: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            merged: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            rejected_parse: AtomicU64::new(0),
            rejected_non_positive: AtomicU64::new(0),
            rejected_unknown_symbol: AtomicU64::new(0),
            computed: AtomicU64::new(0),
            incomplete: AtomicU64::new(0),
            reconnects: AtomicU64::new(0),
            connected: AtomicBool::new(false),
            last_message_time: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a frame from the stream
    #[inline]
    pub fn record_message(&self) {
        self.messages.fetch_add(1, Ordering::Relaxed);
        self.update_last_message_time();
    }

    #[inline]
    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one price field
    #[inline]
    pub fn record_field(&self, outcome: FieldOutcome) {
        let counter = match outcome {
            FieldOutcome::Merged => &self.merged,
            FieldOutcome::Skipped => &self.skipped,
            FieldOutcome::Rejected(RejectReason::ParseError) => &self.rejected_parse,
            FieldOutcome::Rejected(RejectReason::NonPositivePrice) => &self.rejected_non_positive,
            FieldOutcome::Rejected(RejectReason::UnknownSymbol) => &self.rejected_unknown_symbol,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an evaluation pass
    #[inline]
    pub fn record_evaluation(&self, computed: bool) {
        if computed {
            self.computed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.incomplete.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    /// Update last message timestamp
    #[inline]
    fn update_last_message_time(&self) {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        self.last_message_time.store(now, Ordering::Relaxed);
    }

    /// Set connection status
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Get current snapshot of metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let messages = self.messages.load(Ordering::Relaxed);

        let uptime = self.start_time.elapsed().as_secs();
        let rate = if uptime > 0 {
            messages as f64 / uptime as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            messages,
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            merged: self.merged.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            rejected_parse: self.rejected_parse.load(Ordering::Relaxed),
            rejected_non_positive: self.rejected_non_positive.load(Ordering::Relaxed),
            rejected_unknown_symbol: self.rejected_unknown_symbol.load(Ordering::Relaxed),
            computed: self.computed.load(Ordering::Relaxed),
            incomplete: self.incomplete.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
            connected: self.is_connected(),
            message_rate: rate,
            uptime_seconds: uptime,
        }
    }

    /// Get latency estimate in milliseconds
    /// Returns time since last message, capped at 10000ms
    pub fn latency_ms(&self) -> u64 {
        let last = self.last_message_time.load(Ordering::Relaxed);
        if last == 0 {
            return 10000; // No messages yet
        }

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        now.saturating_sub(last).min(10000)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
