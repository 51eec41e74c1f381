//! Binance spot WebSocket client
//!
//! One raw-stream connection carrying `<symbol>@bookTicker` for every
//! triangle symbol. Subscription is encoded in the URL path, so no
//! SUBSCRIBE request is sent after connecting.

use crate::core::Symbol;
use crate::exchanges::parsing::{BinanceMessageType, BinanceParser};
use crate::exchanges::traits::{ExchangeMessage, WebSocketExchange};
use crate::infrastructure::config::StreamConfig;
use crate::ws::connection::WebSocketConnection;
use crate::{Result, TriArbError};
use std::time::Duration;
use tokio_tungstenite::tungstenite::protocol::Message;

/// Build the raw-stream URL for a set of symbols
///
/// `wss://stream.binance.com:9443/ws/btcusdt@bookTicker/ethusdt@bookTicker`
pub fn book_ticker_url<'a>(base_url: &str, symbols: impl IntoIterator<Item = &'a Symbol>) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();
    for symbol in symbols {
        url.push('/');
        url.push_str(&symbol.stream_name());
        url.push_str("@bookTicker");
    }
    url
}

/// Binance spot WebSocket client
pub struct BinanceWsClient {
    /// WebSocket connection
    connection: Option<WebSocketConnection>,
    /// Stream URL with all subscriptions
    url: String,
    user_agent: String,
    connect_timeout: Duration,
    /// Reusable text buffer for the current frame
    frame: String,
}

impl BinanceWsClient {
    pub fn new<'a>(config: &StreamConfig, symbols: impl IntoIterator<Item = &'a Symbol>) -> Self {
        Self {
            connection: None,
            url: book_ticker_url(&config.base_url, symbols),
            user_agent: config.user_agent.clone(),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            frame: String::with_capacity(512),
        }
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Decode one text frame
    fn decode(text: &str) -> ExchangeMessage<'_> {
        let data = text.as_bytes();
        match BinanceParser::detect_message_type(data) {
            BinanceMessageType::BookTicker => match BinanceParser::parse_book_ticker(data) {
                Some(ticker) => ExchangeMessage::BookTicker(ticker),
                None => ExchangeMessage::Undecodable(text),
            },
            BinanceMessageType::SubscriptionResponse | BinanceMessageType::Unknown => {
                ExchangeMessage::Heartbeat
            }
        }
    }
}

impl WebSocketExchange for BinanceWsClient {
    #[inline]
    fn name(&self) -> &'static str {
        "binance"
    }

    async fn connect(&mut self) -> Result<()> {
        self.close().await;

        let conn = WebSocketConnection::connect(&self.url, &self.user_agent, self.connect_timeout)
            .await
            .map_err(|e| TriArbError::WebSocket(e.to_string()))?;
        self.connection = Some(conn);

        Ok(())
    }

    async fn next_message(&mut self) -> Result<Option<ExchangeMessage<'_>>> {
        let conn = self
            .connection
            .as_mut()
            .ok_or_else(|| TriArbError::WebSocket("not connected".to_string()))?;

        let received = conn.recv().await;
        match received {
            Ok(Some(Message::Text(text))) => {
                self.frame.clear();
                self.frame.push_str(text.as_str());
            }
            Ok(Some(Message::Close(_))) | Ok(None) => {
                self.connection = None;
                return Ok(None);
            }
            Ok(Some(_)) => return Ok(Some(ExchangeMessage::Heartbeat)),
            Err(e) => {
                self.connection = None;
                return Err(TriArbError::WebSocket(e.to_string()));
            }
        }

        Ok(Some(Self::decode(&self.frame)))
    }

    async fn close(&mut self) {
        if let Some(mut conn) = self.connection.take() {
            conn.close().await;
        }
    }

    #[inline]
    fn is_connected(&self) -> bool {
        self.connection
            .as_ref()
            .map(|c| c.is_connected())
            .unwrap_or(false)
    }
}
