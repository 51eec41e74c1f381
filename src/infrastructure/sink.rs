//! Evaluation outcome consumers
//!
//! The engine hands every outcome to an `OutcomeSink`. Sinks decide what
//! is worth showing: `LogSink` applies the alert threshold, `LatestRatio`
//! keeps the newest result for the API.

use crate::hot_path::{ArbitrageResult, EvaluationOutcome};
use crate::infrastructure::config::ReportConfig;
use crate::log_signal;
use parking_lot::RwLock;
use std::sync::Arc;
use time::format_description::FormatItem;
use time::macros::format_description;

const CLOCK: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// Consumer of evaluation outcomes
///
/// Called synchronously on the ingest path; implementations must not block.
pub trait OutcomeSink: Send + Sync {
    fn on_outcome(&self, outcome: &EvaluationOutcome);
}

impl<T: OutcomeSink + ?Sized> OutcomeSink for Arc<T> {
    #[inline]
    fn on_outcome(&self, outcome: &EvaluationOutcome) {
        (**self).on_outcome(outcome)
    }
}

impl<A: OutcomeSink, B: OutcomeSink> OutcomeSink for (A, B) {
    #[inline]
    fn on_outcome(&self, outcome: &EvaluationOutcome) {
        self.0.on_outcome(outcome);
        self.1.on_outcome(outcome);
    }
}

/// Format a result as `[HH:MM:SS] Arbitrage ratio: 1.015385`
pub fn format_ratio(result: &ArbitrageResult, precision: usize) -> String {
    let clock = result
        .timestamp
        .format(CLOCK)
        .unwrap_or_else(|_| "--:--:--".to_string());
    format!(
        "[{}] Arbitrage ratio: {:.*}",
        clock, precision, result.ratio
    )
}

/// Logs computed ratios on the `signal` target
pub struct LogSink {
    alert_ratio: f64,
    precision: usize,
}

impl LogSink {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            alert_ratio: config.alert_ratio,
            precision: config.precision,
        }
    }

    /// Whether a ratio clears the alert threshold
    #[inline]
    pub fn is_alert(&self, ratio: f64) -> bool {
        ratio >= self.alert_ratio
    }
}

impl OutcomeSink for LogSink {
    fn on_outcome(&self, outcome: &EvaluationOutcome) {
        match outcome {
            EvaluationOutcome::Computed(result) if self.is_alert(result.ratio) => {
                log_signal!(
                    tracing::Level::INFO,
                    triangle = %result.triangle,
                    "OPPORTUNITY {}",
                    format_ratio(result, self.precision)
                );
            }
            EvaluationOutcome::Computed(result) => {
                log_signal!(tracing::Level::DEBUG, "{}", format_ratio(result, self.precision));
            }
            EvaluationOutcome::Incomplete => {
                log_signal!(tracing::Level::TRACE, "Triangle incomplete, waiting for legs");
            }
        }
    }
}

/// Most recent computed result, readable from other tasks
#[derive(Default)]
pub struct LatestRatio {
    inner: RwLock<Option<ArbitrageResult>>,
}

impl LatestRatio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<ArbitrageResult> {
        self.inner.read().clone()
    }
}

impl OutcomeSink for LatestRatio {
    #[inline]
    fn on_outcome(&self, outcome: &EvaluationOutcome) {
        // Incomplete never clears a previous ratio: legs only ever get replaced, not removed
        if let EvaluationOutcome::Computed(result) = outcome {
            *self.inner.write() = Some(result.clone());
        }
    }
}
