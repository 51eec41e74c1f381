//! Symbol keys for the price table
//!
//! Symbols are opaque, case-sensitive ticker names ("BTCUSDT").
//! Backed by `Arc<str>` so cloning a key into the table, the triangle
//! and every emitted result never copies the string.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Symbol(Arc<str>);

impl Symbol {
    #[inline]
    pub fn new(name: &str) -> Option<Self> {
        if name.is_empty() {
            return None;
        }
        Some(Self(Arc::from(name)))
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased name as used in Binance stream names
    pub fn stream_name(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl Borrow<str> for Symbol {
    #[inline(always)]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_symbol_rejected() {
        assert!(Symbol::new("").is_none());
    }

    #[test]
    fn test_symbol_is_case_sensitive() {
        let upper = Symbol::new("BTCUSDT").unwrap();
        let lower = Symbol::new("btcusdt").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Symbol::new("ETHBTC").unwrap(), 1u32);
        assert_eq!(map.get("ETHBTC"), Some(&1));
        assert_eq!(map.get("ethbtc"), None);
    }

    #[test]
    fn test_stream_name() {
        let sym = Symbol::new("ETHUSDT").unwrap();
        assert_eq!(sym.stream_name(), "ethusdt");
        assert_eq!(sym.to_string(), "ETHUSDT");
    }
}
