//! Infrastructure - cold path only
//!
//! This module contains non-latency-critical code:
//! - Logging and metrics
//! - Configuration management
//! - Outcome sinks
//! - HTTP API

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod sink;

pub use api::{start_server, AppState};
pub use sink::{LatestRatio, LogSink, OutcomeSink};
