//! Triangular arbitrage ratio monitor for Binance bookTicker streams
//!
//! # Architecture
//! - **core**: Symbols, quote events, price table, triangle definition
//! - **hot_path**: Quote ingestion and ratio evaluation
//! - **exchanges**: Binance stream client and frame parsing
//! - **ws**: WebSocket connection and reconnect backoff
//! - **infrastructure**: Cold path (logging, metrics, config, sinks, api)

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tri_arb::engine::AppEngine;
use tri_arb::exchanges::BinanceWsClient;
use tri_arb::hot_path::QuoteIngestor;
use tri_arb::infrastructure::logging::init_logging;
use tri_arb::infrastructure::metrics::MetricsCollector;
use tri_arb::infrastructure::{start_server, AppState, LatestRatio, LogSink};
use tri_arb::ws::ReconnectBackoff;
use tri_arb::{log_api, log_main, Config};
use tracing::Level;

/// Main application state
pub struct TriArbApp {
    config: Config,
}

impl TriArbApp {
    /// Create new application instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run until ctrl-c or SIGTERM
    pub async fn run(&self) -> anyhow::Result<()> {
        // 1. Initialize Core Components
        let triangle = Arc::new(
            self.config
                .triangle
                .build()
                .context("Invalid triangle configuration")?,
        );
        log_main!(Level::INFO, triangle = %triangle, "Starting triangular arbitrage monitor");

        let ingestor = QuoteIngestor::new(triangle.clone());
        let metrics = Arc::new(MetricsCollector::new());
        let latest = Arc::new(LatestRatio::new());

        // 2. Start API Server (Cold Path)
        if self.config.api.enabled {
            let state = AppState {
                table: ingestor.table(),
                latest: latest.clone(),
                metrics: metrics.clone(),
                triangle: triangle.clone(),
            };
            let port = self.config.api.port;
            tokio::spawn(async move {
                if let Err(e) = start_server(state, port).await {
                    log_api!(Level::ERROR, "API Server failed: {}", e);
                }
            });
        }

        // 3. Run the engine on the Binance stream
        let stream = &self.config.stream;
        let mut exchange = BinanceWsClient::new(stream, triangle.symbols());
        log_main!(Level::INFO, url = exchange.url(), "Stream configured");

        let sink = (LogSink::new(&self.config.report), latest);
        let engine = AppEngine::new(ingestor, sink, metrics).with_backoff(ReconnectBackoff::new(
            Duration::from_millis(stream.reconnect_initial_ms),
            Duration::from_millis(stream.reconnect_max_ms),
        ));

        engine.run(&mut exchange, shutdown_signal()).await;

        log_main!(Level::INFO, "Stopped");
        Ok(())
    }
}

/// Resolve on ctrl-c, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_main!(Level::ERROR, "Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log_main!(Level::ERROR, "Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    // Guards flush file logs on drop; keep them for the whole run
    let _guards = init_logging(&config.logging).context("Failed to initialize logging")?;

    TriArbApp::new(config).run().await
}
