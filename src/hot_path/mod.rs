//! Hot path operations - zero allocation, zero panic
//!
//! This module contains latency-critical code:
//! - Quote validation and merging
//! - Triangle ratio evaluation

pub mod evaluator;
pub mod ingestor;

pub use evaluator::{ArbitrageEvaluator, ArbitrageResult, EvaluationOutcome};
pub use ingestor::{
    parse_price, ApplyOutcome, BatchOutcome, FieldOutcome, QuoteIngestor, RejectReason,
};
