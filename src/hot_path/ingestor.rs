//! Quote ingestion
//!
//! Validates one side of a quote, merges it into the shared table
//! (last write wins per symbol and side) and evaluates the triangle
//! against the table as it stands right after that merge.
//!
//! Parsing and validation run before the lock is taken. The write guard is
//! downgraded, not released, before evaluation, so no other writer can slip
//! in between the merge and the evaluation that follows it.

use crate::core::{QuoteEvent, QuoteSide, SharedPriceTable, PriceTable, Symbol, TriangleSpec};
use crate::hot_path::{ArbitrageEvaluator, EvaluationOutcome};
use parking_lot::RwLockWriteGuard;
use std::sync::Arc;

/// Why an update was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Price text is not a finite decimal number
    ParseError,
    /// Price parsed but is zero or negative
    NonPositivePrice,
    /// Symbol is outside the configured universe
    UnknownSymbol,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "parse_error",
            Self::NonPositivePrice => "non_positive_price",
            Self::UnknownSymbol => "unknown_symbol",
        }
    }
}

/// Result of applying one quote event
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// Price stored; carries the evaluation of the post-merge table
    Merged(EvaluationOutcome),
    /// Empty price text, nothing to do
    Skipped,
    /// Dropped; table unchanged
    Rejected(RejectReason),
}

impl ApplyOutcome {
    #[inline(always)]
    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

/// Per-field result inside a multi-field apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    Merged,
    Skipped,
    Rejected(RejectReason),
}

/// Result of applying several fields atomically
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<const N: usize> {
    pub fields: [FieldOutcome; N],
    /// `None` when no field was merged
    pub evaluation: Option<EvaluationOutcome>,
}

/// Validated but not yet applied field
enum Validated<'s> {
    Merge(&'s Symbol, QuoteSide, f64),
    Skip,
    Reject(RejectReason),
}

impl Validated<'_> {
    #[inline]
    fn field_outcome(&self) -> FieldOutcome {
        match self {
            Self::Merge(..) => FieldOutcome::Merged,
            Self::Skip => FieldOutcome::Skipped,
            Self::Reject(reason) => FieldOutcome::Rejected(*reason),
        }
    }
}

/// Parse a wire price
///
/// `Ok(None)` for empty text (no update for this side).
#[inline]
pub fn parse_price(raw: &str) -> Result<Option<f64>, RejectReason> {
    if raw.is_empty() {
        return Ok(None);
    }

    let price: f64 = raw.parse().map_err(|_| RejectReason::ParseError)?;
    // "NaN" and "inf" parse successfully but are not prices
    if !price.is_finite() {
        return Err(RejectReason::ParseError);
    }
    if price <= 0.0 {
        return Err(RejectReason::NonPositivePrice);
    }

    Ok(Some(price))
}

/// Owner of the price table's write side
pub struct QuoteIngestor {
    table: SharedPriceTable,
    triangle: Arc<TriangleSpec>,
}

impl QuoteIngestor {
    /// Create an ingestor with a fresh table sized for the triangle
    pub fn new(triangle: Arc<TriangleSpec>) -> Self {
        Self {
            table: SharedPriceTable::new(PriceTable::with_capacity(3)),
            triangle,
        }
    }

    /// Read handle for evaluators and telemetry
    #[inline]
    pub fn table(&self) -> SharedPriceTable {
        self.table.clone()
    }

    /// Apply one quote event and evaluate
    pub fn apply(&self, event: QuoteEvent<'_>) -> ApplyOutcome {
        match self.validate(event) {
            Validated::Skip => ApplyOutcome::Skipped,
            Validated::Reject(reason) => ApplyOutcome::Rejected(reason),
            Validated::Merge(symbol, side, price) => {
                let mut table = self.table.write();
                table.set(symbol, side, price);
                ApplyOutcome::Merged(self.evaluate_locked(table))
            }
        }
    }

    /// Apply several fields in one exclusive section, then evaluate once
    ///
    /// Used for bookTicker frames so bid and ask of one frame are never
    /// observed half-applied.
    pub fn apply_all<const N: usize>(&self, events: [QuoteEvent<'_>; N]) -> BatchOutcome<N> {
        let validated = events.map(|event| self.validate(event));

        let mut fields = [FieldOutcome::Skipped; N];
        for (field, v) in fields.iter_mut().zip(validated.iter()) {
            *field = v.field_outcome();
        }

        if !fields.contains(&FieldOutcome::Merged) {
            return BatchOutcome {
                fields,
                evaluation: None,
            };
        }

        let mut table = self.table.write();
        for v in &validated {
            if let Validated::Merge(symbol, side, price) = v {
                table.set(symbol, *side, *price);
            }
        }

        BatchOutcome {
            fields,
            evaluation: Some(self.evaluate_locked(table)),
        }
    }

    /// Downgrade to shared access and evaluate the post-merge state
    #[inline]
    fn evaluate_locked(&self, table: RwLockWriteGuard<'_, PriceTable>) -> EvaluationOutcome {
        let table = RwLockWriteGuard::downgrade(table);
        ArbitrageEvaluator::evaluate(&table, &self.triangle)
    }

    #[inline]
    fn validate(&self, event: QuoteEvent<'_>) -> Validated<'_> {
        if event.raw_price.is_empty() {
            return Validated::Skip;
        }

        let symbol = match self.resolve(event.symbol) {
            Some(symbol) => symbol,
            None => return Validated::Reject(RejectReason::UnknownSymbol),
        };

        match parse_price(event.raw_price) {
            Ok(Some(price)) => Validated::Merge(symbol, event.side, price),
            Ok(None) => Validated::Skip,
            Err(reason) => Validated::Reject(reason),
        }
    }

    /// Map a wire symbol onto the universe's key
    #[inline]
    fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.triangle.symbols().find(|symbol| symbol.as_str() == name)
    }
}
