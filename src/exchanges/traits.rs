//! Exchange abstraction traits
//!
//! Zero-cost abstraction for a quote stream. The engine is generic over
//! `WebSocketExchange`, so there is no dynamic dispatch on the hot path and
//! tests can drive the engine with a scripted source.

use crate::core::BookTicker;
use crate::Result;

/// Decoded message from an exchange
///
/// Borrows from the exchange's receive buffer; valid until the next call
/// to `next_message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeMessage<'a> {
    /// Top-of-book update
    BookTicker(BookTicker<'a>),
    /// Control traffic (ping/pong, subscription acks, unknown events)
    Heartbeat,
    /// Frame that looked like market data but failed to decode
    Undecodable(&'a str),
}

/// WebSocket exchange interface
///
/// # Design Notes
/// - Async methods for non-blocking operations
/// - `next_message()` is the hot path - returns borrowed data only
/// - `Ok(None)` means the session ended; the caller decides whether to reconnect
#[allow(async_fn_in_trait)]
pub trait WebSocketExchange: Send {
    /// Exchange name (for logging/metrics)
    fn name(&self) -> &'static str;

    /// Open a new session, replacing any previous one
    async fn connect(&mut self) -> Result<()>;

    /// Receive next message (hot path)
    async fn next_message(&mut self) -> Result<Option<ExchangeMessage<'_>>>;

    /// Close the current session
    async fn close(&mut self);

    /// Check if connection is active
    fn is_connected(&self) -> bool;
}
