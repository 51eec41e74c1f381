//! Triangular ratio evaluation
//!
//! Reads the three configured legs from one table snapshot and multiplies
//! their contributions. No thresholding here: whether a ratio is worth
//! acting on is the consumer's call.

use crate::core::{PriceTable, TriangleSpec};
use std::sync::Arc;
use time::OffsetDateTime;

/// A computed ratio
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitrageResult {
    /// Product of the leg contributions (> 1.0 means the cycle gains)
    pub ratio: f64,
    /// Raw leg prices in triangle order
    pub legs: [f64; 3],
    pub triangle: Arc<TriangleSpec>,
    pub timestamp: OffsetDateTime,
}

/// Result of one evaluation pass
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    /// At least one leg has no usable price yet
    Incomplete,
    Computed(ArbitrageResult),
}

impl EvaluationOutcome {
    #[inline]
    pub fn ratio(&self) -> Option<f64> {
        match self {
            Self::Computed(result) => Some(result.ratio),
            Self::Incomplete => None,
        }
    }

    #[inline(always)]
    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }
}

/// Stateless evaluator
pub struct ArbitrageEvaluator;

impl ArbitrageEvaluator {
    /// Evaluate the triangle against a table snapshot, stamped with the current time
    #[inline]
    pub fn evaluate(table: &PriceTable, triangle: &Arc<TriangleSpec>) -> EvaluationOutcome {
        Self::evaluate_at(table, triangle, OffsetDateTime::now_utc())
    }

    /// Evaluate with an explicit timestamp
    pub fn evaluate_at(
        table: &PriceTable,
        triangle: &Arc<TriangleSpec>,
        timestamp: OffsetDateTime,
    ) -> EvaluationOutcome {
        let mut legs = [0.0; 3];
        let mut ratio = 1.0;

        for (slot, leg) in legs.iter_mut().zip(triangle.legs()) {
            // Zero never gets stored, but a zero leg would make the ratio degenerate
            let price = match table.get(leg.symbol.as_str(), leg.side) {
                Some(p) if p > 0.0 && p.is_finite() => p,
                _ => return EvaluationOutcome::Incomplete,
            };
            *slot = price;
            ratio *= leg.role.contribution(price);
        }

        if !ratio.is_finite() {
            return EvaluationOutcome::Incomplete;
        }

        EvaluationOutcome::Computed(ArbitrageResult {
            ratio,
            legs,
            triangle: Arc::clone(triangle),
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{QuoteSide, Symbol};

    fn triangle() -> Arc<TriangleSpec> {
        Arc::new(TriangleSpec::usdt_cycle("XUSDT", "YX", "YUSDT").unwrap())
    }

    fn table(prices: &[(&str, QuoteSide, f64)]) -> PriceTable {
        let mut table = PriceTable::new();
        for (name, side, price) in prices {
            table.set(&Symbol::new(name).unwrap(), *side, *price);
        }
        table
    }

    #[test]
    fn test_incomplete_on_empty_table() {
        let outcome = ArbitrageEvaluator::evaluate(&PriceTable::new(), &triangle());
        assert_eq!(outcome, EvaluationOutcome::Incomplete);
    }

    #[test]
    fn test_incomplete_with_two_legs() {
        let t = table(&[
            ("XUSDT", QuoteSide::Ask, 65000.0),
            ("YX", QuoteSide::Ask, 0.05),
        ]);
        assert_eq!(
            ArbitrageEvaluator::evaluate(&t, &triangle()),
            EvaluationOutcome::Incomplete
        );
    }

    #[test]
    fn test_incomplete_when_wrong_side_quoted() {
        // YUSDT has an ask but the triangle needs its bid
        let t = table(&[
            ("XUSDT", QuoteSide::Ask, 65000.0),
            ("YX", QuoteSide::Ask, 0.05),
            ("YUSDT", QuoteSide::Ask, 3300.0),
        ]);
        assert!(!ArbitrageEvaluator::evaluate(&t, &triangle()).is_computed());
    }

    #[test]
    fn test_canonical_ratio() {
        let t = table(&[
            ("XUSDT", QuoteSide::Ask, 65000.0),
            ("YX", QuoteSide::Ask, 0.05),
            ("YUSDT", QuoteSide::Bid, 3300.0),
        ]);

        let outcome = ArbitrageEvaluator::evaluate(&t, &triangle());
        let ratio = outcome.ratio().expect("all legs present");
        let expected = (1.0 / 65000.0) * (1.0 / 0.05) * 3300.0;
        assert!((ratio - expected).abs() < 1e-12);
        assert!((ratio - 1.015_384_6).abs() < 1e-6);
    }

    #[test]
    fn test_result_carries_legs_and_triangle() {
        let tri = triangle();
        let t = table(&[
            ("XUSDT", QuoteSide::Ask, 2.0),
            ("YX", QuoteSide::Ask, 4.0),
            ("YUSDT", QuoteSide::Bid, 16.0),
        ]);
        let ts = OffsetDateTime::UNIX_EPOCH;

        match ArbitrageEvaluator::evaluate_at(&t, &tri, ts) {
            EvaluationOutcome::Computed(result) => {
                assert_eq!(result.ratio, 2.0);
                assert_eq!(result.legs, [2.0, 4.0, 16.0]);
                assert!(Arc::ptr_eq(&result.triangle, &tri));
                assert_eq!(result.timestamp, ts);
            }
            EvaluationOutcome::Incomplete => panic!("Expected Computed"),
        }
    }

    #[test]
    fn test_no_rounding_applied() {
        let t = table(&[
            ("XUSDT", QuoteSide::Ask, 3.0),
            ("YX", QuoteSide::Ask, 7.0),
            ("YUSDT", QuoteSide::Bid, 1.0),
        ]);
        let ratio = ArbitrageEvaluator::evaluate(&t, &triangle()).ratio().unwrap();
        assert_eq!(ratio, (1.0 / 3.0) * (1.0 / 7.0) * 1.0);
    }

    #[test]
    fn test_overflowing_product_is_incomplete() {
        let tri = Arc::new(
            TriangleSpec::new([
                ("A", QuoteSide::Bid, crate::core::LegRole::Direct),
                ("B", QuoteSide::Bid, crate::core::LegRole::Direct),
                ("C", QuoteSide::Bid, crate::core::LegRole::Direct),
            ])
            .unwrap(),
        );
        let t = table(&[
            ("A", QuoteSide::Bid, 1e200),
            ("B", QuoteSide::Bid, 1e200),
            ("C", QuoteSide::Bid, 1.0),
        ]);
        assert_eq!(
            ArbitrageEvaluator::evaluate(&t, &tri),
            EvaluationOutcome::Incomplete
        );
    }
}
