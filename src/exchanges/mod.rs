//! Exchange-specific implementations

pub mod binance;
pub mod parsing;
pub mod traits;

pub use binance::{book_ticker_url, BinanceWsClient};
pub use parsing::BinanceParser;
pub use traits::{ExchangeMessage, WebSocketExchange};
