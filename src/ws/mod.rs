//! WebSocket transport for real-time market data

pub mod backoff;
pub mod connection;

pub use backoff::ReconnectBackoff;
pub use connection::{WebSocketConnection, WebSocketError};
