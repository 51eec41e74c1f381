//! API Server (Cold Path)
//!
//! Read-only JSON view of the price table, the latest ratio and the
//! metrics counters. Never takes the price table's write lock.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use tower_http::cors::CorsLayer;

use crate::core::{QuoteSide, SharedPriceTable, TriangleSpec};
use crate::infrastructure::metrics::{MetricsCollector, MetricsSnapshot};
use crate::infrastructure::sink::LatestRatio;
use crate::log_api;
use crate::TriArbError;

/// System status information
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatusDto {
    pub is_connected: bool,
    pub latency_ms: u64,
    pub triangle: String,
    pub metrics: MetricsSnapshot,
}

/// Best bid/ask for one symbol
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDto {
    pub symbol: String,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
}

/// One leg of the latest evaluation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDto {
    pub symbol: String,
    pub side: QuoteSide,
    pub price: f64,
}

/// Latest computed ratio
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioDto {
    pub ratio: f64,
    pub triangle: String,
    pub legs: Vec<LegDto>,
    pub timestamp: String,
    pub timestamp_ms: i64,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub table: SharedPriceTable,
    pub latest: Arc<LatestRatio>,
    pub metrics: Arc<MetricsCollector>,
    pub triangle: Arc<TriangleSpec>,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/prices", get(get_prices))
        .route("/api/ratio", get(get_ratio))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server
pub async fn start_server(state: AppState, port: u16) -> Result<(), TriArbError> {
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    log_api!(tracing::Level::INFO, "API Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Handler for /api/status
async fn get_status(State(state): State<AppState>) -> Json<SystemStatusDto> {
    Json(SystemStatusDto {
        is_connected: state.metrics.is_connected(),
        latency_ms: state.metrics.latency_ms(),
        triangle: state.triangle.to_string(),
        metrics: state.metrics.snapshot(),
    })
}

/// Handler for /api/prices
/// Symbols in triangle order; unseen symbols report null sides
async fn get_prices(State(state): State<AppState>) -> Json<Vec<PriceDto>> {
    let table = state.table.read();

    let prices = state
        .triangle
        .symbols()
        .map(|symbol| {
            let entry = table.entry(symbol.as_str()).copied().unwrap_or_default();
            PriceDto {
                symbol: symbol.to_string(),
                bid: entry.bid,
                ask: entry.ask,
            }
        })
        .collect();

    Json(prices)
}

/// Handler for /api/ratio
/// `null` until the first complete evaluation
async fn get_ratio(State(state): State<AppState>) -> Json<Option<RatioDto>> {
    let dto = state.latest.get().map(|result| {
        let legs = result
            .triangle
            .legs()
            .iter()
            .zip(result.legs)
            .map(|(leg, price)| LegDto {
                symbol: leg.symbol.to_string(),
                side: leg.side,
                price,
            })
            .collect();

        RatioDto {
            ratio: result.ratio,
            triangle: result.triangle.to_string(),
            legs,
            timestamp: result.timestamp.format(&Rfc3339).unwrap_or_default(),
            timestamp_ms: (result.timestamp.unix_timestamp_nanos() / 1_000_000) as i64,
        }
    });

    Json(dto)
}
