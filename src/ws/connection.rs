//! WebSocket connection with HFT optimizations
//!
//! Low-latency WebSocket client using tokio-tungstenite.
//! - Handshake carries a User-Agent header
//! - Connect is bounded by a timeout
//! - TCP_NODELAY on plain streams
//! - No logging in send/recv

use futures_util::StreamExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{HeaderValue, USER_AGENT};
use tokio_tungstenite::tungstenite::{self, protocol::Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// WebSocket connection optimized for HFT
pub struct WebSocketConnection {
    /// Underlying WebSocket stream
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// Connection state
    state: ConnectionState,
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionState {
    /// Connected and ready
    Connected,
    /// Disconnected
    Disconnected,
}

/// Errors that can occur with WebSocket connections
#[derive(Debug, thiserror::Error)]
pub enum WebSocketError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Handshake rejected with HTTP {0}")]
    HandshakeRejected(u16),
    #[error("Receive failed: {0}")]
    ReceiveFailed(String),
    #[error("Timeout")]
    Timeout,
    #[error("Not connected")]
    NotConnected,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, WebSocketError>;

impl WebSocketConnection {
    /// Connect to WebSocket endpoint
    ///
    /// # Arguments
    /// * `url` - WebSocket URL (wss:// or ws://)
    /// * `user_agent` - value of the handshake User-Agent header
    /// * `connect_timeout` - upper bound on TCP + TLS + upgrade
    pub async fn connect(url: &str, user_agent: &str, connect_timeout: Duration) -> Result<Self> {
        let mut request = url
            .into_client_request()
            .map_err(|e| WebSocketError::InvalidRequest(e.to_string()))?;
        let agent = HeaderValue::from_str(user_agent)
            .map_err(|e| WebSocketError::InvalidRequest(e.to_string()))?;
        request.headers_mut().insert(USER_AGENT, agent);

        let (ws_stream, _) = timeout(connect_timeout, connect_async(request))
            .await
            .map_err(|_| WebSocketError::Timeout)?
            .map_err(|e| match e {
                tungstenite::Error::Http(response) => {
                    WebSocketError::HandshakeRejected(response.status().as_u16())
                }
                other => WebSocketError::ConnectionFailed(other.to_string()),
            })?;

        if let MaybeTlsStream::Plain(tcp) = ws_stream.get_ref() {
            Self::optimize_tcp_stream(tcp)?;
        }

        Ok(Self {
            stream: ws_stream,
            state: ConnectionState::Connected,
        })
    }

    /// Disable Nagle's algorithm - send packets immediately
    fn optimize_tcp_stream(stream: &TcpStream) -> Result<()> {
        stream
            .set_nodelay(true)
            .map_err(|e| WebSocketError::ConnectionFailed(e.to_string()))
    }

    /// Receive a message
    ///
    /// Returns `None` on graceful close. Pong replies to server pings are
    /// queued by tungstenite and flushed on the next read.
    pub async fn recv(&mut self) -> Result<Option<Message>> {
        if self.state != ConnectionState::Connected {
            return Err(WebSocketError::NotConnected);
        }

        match self.stream.next().await {
            Some(Ok(msg)) => {
                if let Message::Close(_) = msg {
                    self.state = ConnectionState::Disconnected;
                }
                Ok(Some(msg))
            }
            Some(Err(e)) => {
                self.state = ConnectionState::Disconnected;
                Err(WebSocketError::ReceiveFailed(e.to_string()))
            }
            None => {
                self.state = ConnectionState::Disconnected;
                Ok(None)
            }
        }
    }

    /// Check if connected
    #[inline(always)]
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Close the connection gracefully
    pub async fn close(&mut self) {
        if self.state == ConnectionState::Connected {
            // Peer may already be gone; nothing useful to do with the error
            let _ = self.stream.close(None).await;
            self.state = ConnectionState::Disconnected;
        }
    }
}
