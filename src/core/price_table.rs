//! Per-symbol top-of-book price table
//!
//! `PriceTable` is plain data. `SharedPriceTable` wraps it in a
//! reader/writer lock: merges take the write side, evaluation and telemetry
//! take the read side. Only the ingestor can obtain a write guard.

use super::{QuoteSide, Symbol};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Bid and ask for one symbol
///
/// A stored price is always finite and > 0; `None` means never quoted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PriceEntry {
    pub bid: Option<f64>,
    pub ask: Option<f64>,
}

impl PriceEntry {
    #[inline(always)]
    pub fn get(&self, side: QuoteSide) -> Option<f64> {
        match side {
            QuoteSide::Bid => self.bid,
            QuoteSide::Ask => self.ask,
        }
    }

    #[inline(always)]
    fn set(&mut self, side: QuoteSide, price: f64) {
        match side {
            QuoteSide::Bid => self.bid = Some(price),
            QuoteSide::Ask => self.ask = Some(price),
        }
    }
}

/// Symbol -> PriceEntry
///
/// Entries are created on the first quote for a symbol and never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    entries: HashMap<Symbol, PriceEntry>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for a known symbol universe
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn get(&self, symbol: &str, side: QuoteSide) -> Option<f64> {
        self.entries.get(symbol).and_then(|entry| entry.get(side))
    }

    #[inline]
    pub fn entry(&self, symbol: &str) -> Option<&PriceEntry> {
        self.entries.get(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &PriceEntry)> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last-write-wins store of a validated price
    #[inline]
    pub(crate) fn set(&mut self, symbol: &Symbol, side: QuoteSide, price: f64) {
        debug_assert!(price.is_finite() && price > 0.0);

        if let Some(entry) = self.entries.get_mut(symbol.as_str()) {
            entry.set(side, price);
            return;
        }

        let mut entry = PriceEntry::default();
        entry.set(side, price);
        self.entries.insert(symbol.clone(), entry);
    }
}

/// Lock-guarded handle to one price table
///
/// Cloning shares the same table.
#[derive(Debug, Clone, Default)]
pub struct SharedPriceTable {
    inner: Arc<RwLock<PriceTable>>,
}

impl SharedPriceTable {
    pub fn new(table: PriceTable) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    /// Shared access; many readers may hold this at once
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, PriceTable> {
        self.inner.read()
    }

    /// Exclusive access for merges
    #[inline]
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, PriceTable> {
        self.inner.write()
    }

    /// Owned copy of the current state for cold path consumers
    pub fn snapshot(&self) -> PriceTable {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Symbol {
        Symbol::new(name).unwrap()
    }

    #[test]
    fn test_empty_table() {
        let table = PriceTable::new();
        assert!(table.is_empty());
        assert_eq!(table.get("BTCUSDT", QuoteSide::Bid), None);
    }

    #[test]
    fn test_entry_created_lazily() {
        let mut table = PriceTable::new();
        table.set(&sym("BTCUSDT"), QuoteSide::Ask, 65000.0);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("BTCUSDT", QuoteSide::Ask), Some(65000.0));
        assert_eq!(table.get("BTCUSDT", QuoteSide::Bid), None);
    }

    #[test]
    fn test_set_overwrites_only_that_side() {
        let mut table = PriceTable::new();
        let btc = sym("BTCUSDT");
        table.set(&btc, QuoteSide::Bid, 64999.0);
        table.set(&btc, QuoteSide::Ask, 65000.0);
        table.set(&btc, QuoteSide::Ask, 65001.5);

        let entry = table.entry("BTCUSDT").unwrap();
        assert_eq!(entry.bid, Some(64999.0));
        assert_eq!(entry.ask, Some(65001.5));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_shared_handles_see_same_table() {
        let shared = SharedPriceTable::default();
        let reader = shared.clone();

        shared.write().set(&sym("ETHBTC"), QuoteSide::Ask, 0.05);

        assert_eq!(reader.read().get("ETHBTC", QuoteSide::Ask), Some(0.05));
        assert_eq!(reader.snapshot().len(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let shared = SharedPriceTable::default();
        shared.write().set(&sym("ETHUSDT"), QuoteSide::Bid, 3300.0);

        let snap = shared.snapshot();
        shared.write().set(&sym("ETHUSDT"), QuoteSide::Bid, 3301.0);

        assert_eq!(snap.get("ETHUSDT", QuoteSide::Bid), Some(3300.0));
        assert_eq!(shared.read().get("ETHUSDT", QuoteSide::Bid), Some(3301.0));
    }

    #[test]
    fn test_entry_serializes_sides() {
        let entry = PriceEntry {
            bid: Some(1.5),
            ask: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"bid":1.5,"ask":null}"#);
    }
}
