//! Triangle definition
//!
//! Three (symbol, side, role) legs whose contributions multiply into the
//! arbitrage ratio. Built once from configuration and never mutated.

use super::{QuoteSide, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a leg's price enters the ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegRole {
    /// Contributes `1 / price` (buying the base with the quote asset)
    Invert,
    /// Contributes `price` (selling the base for the quote asset)
    Direct,
}

impl LegRole {
    #[inline(always)]
    pub fn contribution(&self, price: f64) -> f64 {
        match self {
            Self::Invert => 1.0 / price,
            Self::Direct => price,
        }
    }
}

/// One participating price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    pub symbol: Symbol,
    pub side: QuoteSide,
    pub role: LegRole,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            LegRole::Invert => write!(f, "1/{}.{}", self.symbol, self.side),
            LegRole::Direct => write!(f, "{}.{}", self.symbol, self.side),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriangleError {
    #[error("leg {0} has an empty symbol")]
    EmptySymbol(usize),
    #[error("symbol {0} appears in more than one leg")]
    DuplicateSymbol(String),
}

/// Immutable triangle configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriangleSpec {
    legs: [Leg; 3],
}

impl TriangleSpec {
    /// Build a triangle from three legs
    ///
    /// # Errors
    /// Returns error if a symbol is empty or two legs share a symbol.
    pub fn new(legs: [(&str, QuoteSide, LegRole); 3]) -> Result<Self, TriangleError> {
        let [a, b, c] = legs;
        let legs = [Self::leg(0, a)?, Self::leg(1, b)?, Self::leg(2, c)?];

        for (i, leg) in legs.iter().enumerate() {
            if legs[..i].iter().any(|prev| prev.symbol == leg.symbol) {
                return Err(TriangleError::DuplicateSymbol(leg.symbol.to_string()));
            }
        }

        Ok(Self { legs })
    }

    fn leg(index: usize, (name, side, role): (&str, QuoteSide, LegRole)) -> Result<Leg, TriangleError> {
        let symbol = Symbol::new(name).ok_or(TriangleError::EmptySymbol(index))?;
        Ok(Leg { symbol, side, role })
    }

    /// Canonical USDT cycle: USDT -> X -> Y -> USDT
    ///
    /// ratio = (1 / ask XUSDT) * (1 / ask YX) * bid YUSDT
    pub fn usdt_cycle(x_usdt: &str, y_x: &str, y_usdt: &str) -> Result<Self, TriangleError> {
        Self::new([
            (x_usdt, QuoteSide::Ask, LegRole::Invert),
            (y_x, QuoteSide::Ask, LegRole::Invert),
            (y_usdt, QuoteSide::Bid, LegRole::Direct),
        ])
    }

    #[inline(always)]
    pub fn legs(&self) -> &[Leg; 3] {
        &self.legs
    }

    /// The symbol universe: the three leg symbols
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.legs.iter().map(|leg| &leg.symbol)
    }

    #[inline]
    pub fn contains(&self, symbol: &str) -> bool {
        self.legs.iter().any(|leg| leg.symbol.as_str() == symbol)
    }
}

impl fmt::Display for TriangleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = &self.legs;
        write!(f, "{a} * {b} * {c}")
    }
}
