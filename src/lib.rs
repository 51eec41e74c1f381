//! Triangular arbitrage ratio monitor
//!
//! Keeps the latest best bid/ask for three trading pairs and recomputes the
//! cycle ratio after every accepted quote.

pub mod core;
pub mod engine;
pub mod exchanges;
pub mod hot_path;
pub mod infrastructure;
pub mod rest;
pub mod ws;

// Re-export commonly used types
pub use infrastructure::config::{Config, ConfigError};

use thiserror::Error;

/// Main error type
#[derive(Error, Debug)]
pub enum TriArbError {
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TriArbError>;
