//! Binance message parser
//!
//! Decodes bookTicker frames from the raw `/ws/` stream and from the
//! combined `/stream?streams=` envelope. Zero-copy: the returned
//! `BookTicker` borrows from the frame.

use super::{field_str, find_field, parse_u64};
use crate::core::BookTicker;

/// Binance message parser
pub struct BinanceParser;

impl BinanceParser {
    /// Parse bookTicker message into BookTicker
    ///
    /// Raw stream format:
    /// {"u":400900217,"s":"BNBUSDT","b":"25.35190000","B":"31.21000000","a":"25.36520000","A":"40.66000000"}
    ///
    /// Combined stream format:
    /// {"stream":"bnbusdt@bookTicker","data":{...raw payload...}}
    ///
    /// A missing price field decodes as empty text (no update for that side).
    /// A missing symbol is a decode failure.
    #[inline]
    pub fn parse_book_ticker(data: &[u8]) -> Option<BookTicker<'_>> {
        let symbol = field_str(data, b"s")?;
        if symbol.is_empty() {
            return None;
        }

        let update_id = find_field(data, b"u").and_then(parse_u64);
        let bid_price = field_str(data, b"b").unwrap_or("");
        let ask_price = field_str(data, b"a").unwrap_or("");

        Some(BookTicker {
            update_id,
            symbol,
            bid_price,
            ask_price,
        })
    }

    /// Detect message type without full parsing
    #[inline]
    pub fn detect_message_type(data: &[u8]) -> BinanceMessageType {
        if data.windows(10).any(|w| w == b"bookTicker") {
            return BinanceMessageType::BookTicker;
        }
        // Raw bookTicker frames carry no event name; key on the update id and symbol
        if find_field(data, b"u").is_some() && find_field(data, b"s").is_some() {
            return BinanceMessageType::BookTicker;
        }
        if find_field(data, b"result") == Some(b"null".as_slice()) {
            return BinanceMessageType::SubscriptionResponse;
        }
        BinanceMessageType::Unknown
    }
}

/// Binance message types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinanceMessageType {
    BookTicker,
    SubscriptionResponse,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_BOOK_TICKER: &[u8] = br#"{
        "u": 400900217,
        "s": "BNBUSDT",
        "b": "25.35190000",
        "B": "31.21000000",
        "a": "25.36520000",
        "A": "40.66000000"
    }"#;

    const COMBINED_BOOK_TICKER: &[u8] = br#"{"stream":"ethbtc@bookTicker","data":{"u":12,"s":"ETHBTC","b":"0.05010000","B":"3.1","a":"0.05020000","A":"2.0"}}"#;

    #[test]
    fn test_detect_message_type() {
        assert_eq!(
            BinanceParser::detect_message_type(RAW_BOOK_TICKER),
            BinanceMessageType::BookTicker
        );
        assert_eq!(
            BinanceParser::detect_message_type(COMBINED_BOOK_TICKER),
            BinanceMessageType::BookTicker
        );
        assert_eq!(
            BinanceParser::detect_message_type(br#"{"result":null,"id":1}"#),
            BinanceMessageType::SubscriptionResponse
        );
        assert_eq!(
            BinanceParser::detect_message_type(br#"{"ping":1}"#),
            BinanceMessageType::Unknown
        );
    }

    #[test]
    fn test_parse_raw_book_ticker() {
        let ticker = BinanceParser::parse_book_ticker(RAW_BOOK_TICKER).unwrap();
        assert_eq!(ticker.update_id, Some(400900217));
        assert_eq!(ticker.symbol, "BNBUSDT");
        assert_eq!(ticker.bid_price, "25.35190000");
        assert_eq!(ticker.ask_price, "25.36520000");
    }

    #[test]
    fn test_parse_combined_book_ticker() {
        let ticker = BinanceParser::parse_book_ticker(COMBINED_BOOK_TICKER).unwrap();
        assert_eq!(ticker.symbol, "ETHBTC");
        assert_eq!(ticker.update_id, Some(12));
        assert_eq!(ticker.bid_price, "0.05010000");
        assert_eq!(ticker.ask_price, "0.05020000");
    }

    #[test]
    fn test_missing_side_is_empty() {
        let ticker =
            BinanceParser::parse_book_ticker(br#"{"u":1,"s":"ETHUSDT","b":"3300.1"}"#).unwrap();
        assert_eq!(ticker.bid_price, "3300.1");
        assert_eq!(ticker.ask_price, "");
    }

    #[test]
    fn test_missing_symbol_fails() {
        assert!(BinanceParser::parse_book_ticker(br#"{"u":1,"b":"1","a":"2"}"#).is_none());
        assert!(BinanceParser::parse_book_ticker(br#"{"u":1,"s":"","b":"1"}"#).is_none());
    }

    #[test]
    fn test_malformed_price_passes_through() {
        // Price validity is the ingestor's concern, not the decoder's
        let ticker =
            BinanceParser::parse_book_ticker(br#"{"u":1,"s":"ETHUSDT","b":"abc","a":"0"}"#)
                .unwrap();
        assert_eq!(ticker.bid_price, "abc");
        assert_eq!(ticker.ask_price, "0");
    }
}
