//! Triangle Discovery (Cold Path)
//!
//! Fetches Binance spot `exchangeInfo` and lists every quote-asset cycle
//! `X/Q -> Y/X -> Y/Q` among trading symbols. Used by the `find-triangles`
//! tool to produce `[[triangle.legs]]` config; never called by the monitor.

use crate::core::{TriangleError, TriangleSpec};
use crate::infrastructure::config::{LegConfig, TriangleConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Binance spot exchange info endpoint
pub const EXCHANGE_INFO_URL: &str = "https://api.binance.com/api/v3/exchangeInfo";

/// One symbol entry of `exchangeInfo`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    pub quote_asset: String,
}

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

/// A candidate cycle starting and ending in the quote asset
///
/// `x_quote` = X/Q, `cross` = Y/X, `y_quote` = Y/Q
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TriangleCandidate {
    pub x_quote: String,
    pub cross: String,
    pub y_quote: String,
}

impl TriangleCandidate {
    /// Legs in the order the monitor evaluates them
    pub fn to_spec(&self) -> Result<TriangleSpec, TriangleError> {
        TriangleSpec::usdt_cycle(&self.x_quote, &self.cross, &self.y_quote)
    }

    pub fn to_config(&self) -> Result<TriangleConfig, TriangleError> {
        let spec = self.to_spec()?;
        let legs = spec
            .legs()
            .iter()
            .map(|leg| LegConfig {
                symbol: leg.symbol.to_string(),
                side: leg.side,
                role: leg.role,
            })
            .collect();
        Ok(TriangleConfig { legs })
    }

    /// `[[triangle.legs]]` TOML, ready to paste into config.toml
    pub fn to_toml(&self) -> Result<String, DiscoveryError> {
        #[derive(Serialize)]
        struct Section {
            triangle: TriangleConfig,
        }

        let section = Section {
            triangle: self.to_config()?,
        };
        toml::to_string(&section).map_err(|e| DiscoveryError::Render(e.to_string()))
    }
}

/// Find every `X/Q -> Y/X -> Y/Q` cycle among trading symbols
///
/// Results are sorted and unique.
pub fn find_triangles(symbols: &[SymbolInfo], quote: &str) -> Vec<TriangleCandidate> {
    let trading = || symbols.iter().filter(|s| s.status == "TRADING");

    // base asset -> its symbol against the quote asset
    let quoted: HashMap<&str, &str> = trading()
        .filter(|s| s.quote_asset == quote)
        .map(|s| (s.base_asset.as_str(), s.symbol.as_str()))
        .collect();

    let mut triangles: Vec<TriangleCandidate> = trading()
        .filter(|s| s.quote_asset != quote && s.base_asset != quote)
        .filter_map(|cross| {
            let x_quote = quoted.get(cross.quote_asset.as_str())?;
            let y_quote = quoted.get(cross.base_asset.as_str())?;
            Some(TriangleCandidate {
                x_quote: x_quote.to_string(),
                cross: cross.symbol.clone(),
                y_quote: y_quote.to_string(),
            })
        })
        .collect();

    triangles.sort();
    triangles.dedup();
    triangles
}

/// exchangeInfo client
pub struct TriangleDiscovery {
    client: reqwest::Client,
    url: String,
}

impl TriangleDiscovery {
    /// Create new discovery client against the public endpoint
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, DiscoveryError> {
        Self::with_url(EXCHANGE_INFO_URL, user_agent, timeout)
    }

    pub fn with_url(url: &str, user_agent: &str, timeout: Duration) -> Result<Self, DiscoveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DiscoveryError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Fetch all spot symbols
    ///
    /// API: GET https://api.binance.com/api/v3/exchangeInfo
    pub async fn fetch_symbols(&self) -> Result<Vec<SymbolInfo>, DiscoveryError> {
        tracing::info!("Fetching Binance exchange info from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DiscoveryError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Http(response.status().as_u16()));
        }

        let info: ExchangeInfo = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Parse(e.to_string()))?;

        tracing::info!("Received {} symbols from Binance", info.symbols.len());

        Ok(info.symbols)
    }

    /// Fetch symbols and list the cycles through `quote`
    pub async fn discover(&self, quote: &str) -> Result<Vec<TriangleCandidate>, DiscoveryError> {
        let symbols = self.fetch_symbols().await?;
        let triangles = find_triangles(&symbols, quote);

        if triangles.is_empty() {
            return Err(DiscoveryError::NoTriangles(quote.to_string()));
        }

        Ok(triangles)
    }
}

/// Discovery errors
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No triangles found through {0}")]
    NoTriangles(String),

    #[error("Invalid triangle: {0}")]
    Triangle(#[from] TriangleError),

    #[error("Failed to render config: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::Config;

    fn info(symbol: &str, base: &str, quote: &str, status: &str) -> SymbolInfo {
        SymbolInfo {
            symbol: symbol.to_string(),
            status: status.to_string(),
            base_asset: base.to_string(),
            quote_asset: quote.to_string(),
        }
    }

    fn universe() -> Vec<SymbolInfo> {
        vec![
            info("BTCUSDT", "BTC", "USDT", "TRADING"),
            info("ETHUSDT", "ETH", "USDT", "TRADING"),
            info("BNBUSDT", "BNB", "USDT", "TRADING"),
            info("ETHBTC", "ETH", "BTC", "TRADING"),
            info("BNBBTC", "BNB", "BTC", "TRADING"),
            info("BNBETH", "BNB", "ETH", "BREAK"),
            info("XRPBTC", "XRP", "BTC", "TRADING"),
        ]
    }

    #[test]
    fn test_parse_exchange_info() {
        let json = r#"{
            "timezone": "UTC",
            "symbols": [
                {"symbol":"ETHBTC","status":"TRADING","baseAsset":"ETH","quoteAsset":"BTC","filters":[]}
            ]
        }"#;
        let parsed: ExchangeInfo = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.symbols, vec![info("ETHBTC", "ETH", "BTC", "TRADING")]);
    }

    #[test]
    fn test_find_usdt_triangles() {
        let triangles = find_triangles(&universe(), "USDT");

        assert_eq!(
            triangles,
            vec![
                TriangleCandidate {
                    x_quote: "BTCUSDT".to_string(),
                    cross: "BNBBTC".to_string(),
                    y_quote: "BNBUSDT".to_string(),
                },
                TriangleCandidate {
                    x_quote: "BTCUSDT".to_string(),
                    cross: "ETHBTC".to_string(),
                    y_quote: "ETHUSDT".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_non_trading_and_missing_legs_skipped() {
        let triangles = find_triangles(&universe(), "USDT");
        // BNBETH is halted, XRPUSDT does not exist
        assert!(triangles.iter().all(|t| t.cross != "BNBETH" && t.cross != "XRPBTC"));
        assert!(find_triangles(&universe(), "EUR").is_empty());
    }

    #[test]
    fn test_candidate_to_spec() {
        let candidate = &find_triangles(&universe(), "USDT")[1];
        assert_eq!(
            candidate.to_spec().unwrap().to_string(),
            "1/BTCUSDT.ask * 1/ETHBTC.ask * ETHUSDT.bid"
        );
    }

    #[test]
    fn test_rendered_toml_loads_as_config() {
        let candidate = &find_triangles(&universe(), "USDT")[0];
        let rendered = candidate.to_toml().unwrap();
        assert!(rendered.contains("[[triangle.legs]]"));

        let config = Config::from_toml(&rendered).unwrap();
        let triangle = config.triangle.build().unwrap();
        assert_eq!(triangle, candidate.to_spec().unwrap());
    }

    #[test]
    fn test_client_creation() {
        let discovery =
            TriangleDiscovery::with_url("http://127.0.0.1:9/info", "tri-arb/0.1", Duration::from_secs(1));
        assert!(discovery.is_ok());
    }
}
