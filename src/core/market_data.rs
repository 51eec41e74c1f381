//! Market data types
//!
//! `QuoteEvent` is the normalized input to the ingestor: one side of one
//! symbol with the price still in its wire (text) form. `BookTicker` is the
//! decoded bookTicker frame, borrowed from the receive buffer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quote side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum QuoteSide {
    Bid = 0,
    Ask = 1,
}

impl QuoteSide {
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bid => "bid",
            Self::Ask => "ask",
        }
    }
}

impl fmt::Display for QuoteSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a top-of-book update, price still unparsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteEvent<'a> {
    pub symbol: &'a str,
    pub side: QuoteSide,
    /// Decimal text; empty means no update for this side
    pub raw_price: &'a str,
}

impl<'a> QuoteEvent<'a> {
    #[inline(always)]
    pub const fn new(symbol: &'a str, side: QuoteSide, raw_price: &'a str) -> Self {
        Self {
            symbol,
            side,
            raw_price,
        }
    }
}

/// Decoded bookTicker frame
///
/// Binance spot bookTicker format:
/// {
///   "u": 400900217,
///   "s": "BNBUSDT",
///   "b": "25.35190000",
///   "B": "31.21000000",
///   "a": "25.36520000",
///   "A": "40.66000000"
/// }
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookTicker<'a> {
    pub update_id: Option<u64>,
    pub symbol: &'a str,
    pub bid_price: &'a str,
    pub ask_price: &'a str,
}

impl<'a> BookTicker<'a> {
    /// Split the frame into its bid and ask quote events
    #[inline]
    pub fn quote_events(&self) -> [QuoteEvent<'a>; 2] {
        [
            QuoteEvent::new(self.symbol, QuoteSide::Bid, self.bid_price),
            QuoteEvent::new(self.symbol, QuoteSide::Ask, self.ask_price),
        ]
    }
}
