//! Core Application Engine
//!
//! Drives one exchange stream into the quote ingestor and hands every
//! evaluation to the outcome sink. Owns the reconnect policy: a dropped or
//! refused session is retried with exponential backoff until shutdown.

use crate::core::BookTicker;
use crate::exchanges::{ExchangeMessage, WebSocketExchange};
use crate::hot_path::{BatchOutcome, FieldOutcome, QuoteIngestor, RejectReason};
use crate::infrastructure::metrics::MetricsCollector;
use crate::infrastructure::sink::OutcomeSink;
use crate::ws::ReconnectBackoff;
use crate::{log_exchange, log_ws};
use std::future::Future;
use std::sync::Arc;
use tracing::Level;

/// Main engine managing the stream lifecycle
pub struct AppEngine<S: OutcomeSink> {
    ingestor: QuoteIngestor,
    sink: S,
    metrics: Arc<MetricsCollector>,
    backoff: ReconnectBackoff,
}

impl<S: OutcomeSink> AppEngine<S> {
    /// Create new engine with the default reconnect policy
    pub fn new(ingestor: QuoteIngestor, sink: S, metrics: Arc<MetricsCollector>) -> Self {
        Self {
            ingestor,
            sink,
            metrics,
            backoff: ReconnectBackoff::default(),
        }
    }

    pub fn with_backoff(mut self, backoff: ReconnectBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    #[inline]
    pub fn ingestor(&self) -> &QuoteIngestor {
        &self.ingestor
    }

    /// Get metrics collector reference
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Process one decoded message
    ///
    /// Returns the batch outcome for bookTicker frames, `None` otherwise.
    pub fn handle_message(&self, message: ExchangeMessage<'_>) -> Option<BatchOutcome<2>> {
        self.metrics.record_message();

        match message {
            ExchangeMessage::BookTicker(ticker) => Some(self.handle_book_ticker(&ticker)),
            ExchangeMessage::Heartbeat => {
                log_ws!(Level::TRACE, "Heartbeat received");
                None
            }
            ExchangeMessage::Undecodable(text) => {
                self.metrics.record_decode_failure();
                log_exchange!(Level::WARN, frame = %text, "Undecodable bookTicker frame");
                None
            }
        }
    }

    fn handle_book_ticker(&self, ticker: &BookTicker<'_>) -> BatchOutcome<2> {
        let batch = self.ingestor.apply_all(ticker.quote_events());

        for (event, field) in ticker.quote_events().iter().zip(batch.fields) {
            self.metrics.record_field(field);
            match field {
                FieldOutcome::Rejected(RejectReason::UnknownSymbol) => {
                    log_exchange!(
                        Level::DEBUG,
                        symbol = event.symbol,
                        "Quote for symbol outside the triangle"
                    );
                }
                FieldOutcome::Rejected(reason) => {
                    log_exchange!(
                        Level::WARN,
                        symbol = event.symbol,
                        side = %event.side,
                        price = event.raw_price,
                        update_id = ?ticker.update_id,
                        "Rejected quote: {}",
                        reason.as_str()
                    );
                }
                FieldOutcome::Merged | FieldOutcome::Skipped => {}
            }
        }

        if let Some(evaluation) = &batch.evaluation {
            self.metrics.record_evaluation(evaluation.is_computed());
            self.sink.on_outcome(evaluation);
        }

        batch
    }

    /// Run until `shutdown` resolves
    ///
    /// Sessions are restarted after errors or remote close. The backoff
    /// resets whenever a session delivered at least one bookTicker frame.
    pub async fn run<E, F>(&self, exchange: &mut E, shutdown: F)
    where
        E: WebSocketExchange,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut backoff = self.backoff.clone();
        let name = exchange.name();

        log_exchange!(Level::INFO, exchange = name, "Engine starting");

        loop {
            let delivered = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                delivered = self.run_session(exchange) => delivered,
            };
            self.metrics.set_connected(false);

            if delivered {
                backoff.reset();
            }
            let delay = backoff.next_delay();
            self.metrics.record_reconnect();
            log_ws!(
                Level::WARN,
                exchange = name,
                attempt = backoff.attempts(),
                "Reconnecting in {:?}",
                delay
            );

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        log_exchange!(Level::INFO, exchange = name, "Shutdown requested, closing stream");
        exchange.close().await;
        self.metrics.set_connected(false);
    }

    /// Connect and consume until the session ends
    ///
    /// Returns whether any bookTicker frame was received.
    async fn run_session<E: WebSocketExchange>(&self, exchange: &mut E) -> bool {
        let name = exchange.name();

        if let Err(e) = exchange.connect().await {
            log_ws!(Level::ERROR, exchange = name, "Connect failed: {}", e);
            return false;
        }
        self.metrics.set_connected(true);
        log_ws!(Level::INFO, exchange = name, "Connected");

        let mut delivered = false;
        loop {
            match exchange.next_message().await {
                Ok(Some(message)) => {
                    delivered |= matches!(message, ExchangeMessage::BookTicker(_));
                    self.handle_message(message);
                }
                Ok(None) => {
                    log_ws!(Level::WARN, exchange = name, "Connection closed by remote");
                    break;
                }
                Err(e) => {
                    log_ws!(Level::ERROR, exchange = name, "Receive failed: {}", e);
                    break;
                }
            }
        }

        delivered
    }
}
