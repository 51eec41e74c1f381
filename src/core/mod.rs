//! Core types
//!
//! This module contains the fundamental types used throughout the system:
//! - Symbol: Shared string for trading pairs
//! - QuoteEvent / BookTicker: Borrowed top-of-book updates
//! - PriceTable: Latest bid/ask per symbol
//! - TriangleSpec: The three legs being evaluated

pub mod market_data;
pub mod price_table;
pub mod symbol;
pub mod triangle;

pub use market_data::{BookTicker, QuoteEvent, QuoteSide};
pub use price_table::{PriceEntry, PriceTable, SharedPriceTable};
pub use symbol::Symbol;
pub use triangle::{Leg, LegRole, TriangleError, TriangleSpec};
