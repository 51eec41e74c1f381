//! Configuration management
//!
//! Loads configuration from config.toml at startup.
//! All values are configurable to avoid hardcoded constants.

use crate::core::{LegRole, QuoteSide, TriangleError, TriangleSpec};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Process configuration
///
/// Loaded from config.toml at startup. Every section and field has a default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Triangle legs
    #[serde(default)]
    pub triangle: TriangleConfig,

    /// Market data stream settings
    #[serde(default)]
    pub stream: StreamConfig,

    /// API server settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Ratio reporting policy
    #[serde(default)]
    pub report: ReportConfig,
}

/// One configured leg
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LegConfig {
    pub symbol: String,
    pub side: QuoteSide,
    pub role: LegRole,
}

/// Triangle configuration
///
/// ```toml
/// [[triangle.legs]]
/// symbol = "BTCUSDT"
/// side = "ask"
/// role = "invert"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TriangleConfig {
    #[serde(default = "default_legs")]
    pub legs: Vec<LegConfig>,
}

/// Market data stream configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamConfig {
    /// Raw-stream base URL; `/<symbol>@bookTicker` segments are appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent sent in the WebSocket handshake
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// First reconnect delay; doubles per failed attempt
    #[serde(default = "default_reconnect_initial")]
    pub reconnect_initial_ms: u64,

    /// Reconnect delay cap
    #[serde(default = "default_reconnect_max")]
    pub reconnect_max_ms: u64,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Port for HTTP API server
    #[serde(default = "default_api_port")]
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write rolling log files in addition to the console
    #[serde(default = "default_true")]
    pub files: bool,

    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

/// Ratio reporting policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Ratios at or above this are logged at INFO; the rest at DEBUG
    #[serde(default = "default_alert_ratio")]
    pub alert_ratio: f64,

    /// Decimal places when printing a ratio
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for TriangleConfig {
    fn default() -> Self {
        Self {
            legs: default_legs(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout(),
            reconnect_initial_ms: default_reconnect_initial(),
            reconnect_max_ms: default_reconnect_max(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_api_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            files: true,
            dir: default_log_dir(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            alert_ratio: default_alert_ratio(),
            precision: default_precision(),
        }
    }
}

fn default_legs() -> Vec<LegConfig> {
    vec![
        LegConfig {
            symbol: "BTCUSDT".to_string(),
            side: QuoteSide::Ask,
            role: LegRole::Invert,
        },
        LegConfig {
            symbol: "ETHBTC".to_string(),
            side: QuoteSide::Ask,
            role: LegRole::Invert,
        },
        LegConfig {
            symbol: "ETHUSDT".to_string(),
            side: QuoteSide::Bid,
            role: LegRole::Direct,
        },
    ]
}

fn default_base_url() -> String {
    "wss://stream.binance.com:9443/ws".to_string()
}

fn default_user_agent() -> String {
    "tri-arb/0.1".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_reconnect_initial() -> u64 {
    1_000
}

fn default_reconnect_max() -> u64 {
    60_000
}

fn default_api_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_alert_ratio() -> f64 {
    1.0
}

fn default_precision() -> usize {
    6
}

impl Config {
    /// Load configuration from config.toml file
    ///
    /// Path can be overridden with CONFIG_PATH.
    /// If the file doesn't exist, returns default configuration.
    /// # Errors
    /// Returns error if file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(ConfigError::IoError(e)),
        }
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.stream.validate()?;
        Ok(config)
    }
}

impl StreamConfig {
    /// Reject settings that would make every connect time out or retry without pause
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration("stream.connect_timeout_secs"));
        }
        if self.reconnect_initial_ms == 0 {
            return Err(ConfigError::ZeroDuration("stream.reconnect_initial_ms"));
        }
        if self.reconnect_max_ms < self.reconnect_initial_ms {
            return Err(ConfigError::BackoffRange {
                initial_ms: self.reconnect_initial_ms,
                max_ms: self.reconnect_max_ms,
            });
        }
        Ok(())
    }
}

impl TriangleConfig {
    /// Validate into an immutable triangle
    ///
    /// # Errors
    /// Returns error unless there are exactly three legs with distinct,
    /// non-empty symbols.
    pub fn build(&self) -> Result<TriangleSpec, ConfigError> {
        match self.legs.as_slice() {
            [a, b, c] => Ok(TriangleSpec::new([
                (a.symbol.as_str(), a.side, a.role),
                (b.symbol.as_str(), b.side, b.role),
                (c.symbol.as_str(), c.side, c.role),
            ])?),
            legs => Err(ConfigError::LegCount(legs.len())),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("stream.reconnect_max_ms ({max_ms}) is below stream.reconnect_initial_ms ({initial_ms})")]
    BackoffRange { initial_ms: u64, max_ms: u64 },
    #[error("Triangle needs exactly 3 legs, got {0}")]
    LegCount(usize),
    #[error("Invalid triangle: {0}")]
    Triangle(#[from] TriangleError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.stream.base_url, "wss://stream.binance.com:9443/ws");
        assert_eq!(config.stream.reconnect_initial_ms, 1_000);
        assert_eq!(config.stream.reconnect_max_ms, 60_000);
        assert_eq!(config.api.port, 5000);
        assert!(!config.api.enabled);
        assert_eq!(config.report.precision, 6);
        assert_eq!(config.triangle.legs.len(), 3);
    }

    #[test]
    fn test_default_triangle_builds() {
        let triangle = Config::default().triangle.build().unwrap();
        assert_eq!(
            triangle.to_string(),
            "1/BTCUSDT.ask * 1/ETHBTC.ask * ETHUSDT.bid"
        );
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.files);
    }

    #[test]
    fn test_parse_custom_triangle() {
        let config = Config::from_toml(
            r#"
            [[triangle.legs]]
            symbol = "BNBUSDT"
            side = "ask"
            role = "invert"

            [[triangle.legs]]
            symbol = "XRPBNB"
            side = "ask"
            role = "invert"

            [[triangle.legs]]
            symbol = "XRPUSDT"
            side = "bid"
            role = "direct"

            [api]
            enabled = true
            port = 8080

            [report]
            alert_ratio = 1.001
            "#,
        )
        .unwrap();

        assert!(config.api.enabled);
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.report.alert_ratio, 1.001);
        let triangle = config.triangle.build().unwrap();
        assert!(triangle.contains("XRPBNB"));
    }

    #[test]
    fn test_wrong_leg_count() {
        let config = Config::from_toml(
            r#"
            [[triangle.legs]]
            symbol = "BNBUSDT"
            side = "ask"
            role = "invert"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.triangle.build(),
            Err(ConfigError::LegCount(1))
        ));
    }

    #[test]
    fn test_default_stream_is_valid() {
        assert!(StreamConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_reconnect_delay_rejected() {
        let result = Config::from_toml("[stream]\nreconnect_initial_ms = 0");
        assert!(matches!(
            result,
            Err(ConfigError::ZeroDuration("stream.reconnect_initial_ms"))
        ));
    }

    #[test]
    fn test_zero_connect_timeout_rejected() {
        let result = Config::from_toml("[stream]\nconnect_timeout_secs = 0");
        assert!(matches!(
            result,
            Err(ConfigError::ZeroDuration("stream.connect_timeout_secs"))
        ));
    }

    #[test]
    fn test_backoff_cap_below_initial_rejected() {
        let result = Config::from_toml("[stream]\nreconnect_initial_ms = 5000\nreconnect_max_ms = 100");
        assert!(matches!(
            result,
            Err(ConfigError::BackoffRange {
                initial_ms: 5000,
                max_ms: 100
            })
        ));
    }

    #[test]
    fn test_bad_side_is_parse_error() {
        let result = Config::from_toml(
            r#"
            [[triangle.legs]]
            symbol = "BNBUSDT"
            side = "mid"
            role = "invert"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
