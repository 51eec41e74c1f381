//! List Binance spot triangles through a quote asset
//!
//! Usage: `find-triangles [QUOTE]` (default USDT). Prints one
//! `[[triangle.legs]]` block per cycle, ready for config.toml.

use anyhow::Context;
use std::time::Duration;
use tri_arb::infrastructure::logging::init_logging;
use tri_arb::rest::TriangleDiscovery;
use tri_arb::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let mut logging = config.logging.clone();
    logging.files = false;
    let _guards = init_logging(&logging).context("Failed to initialize logging")?;

    let quote = std::env::args().nth(1).unwrap_or_else(|| "USDT".to_string());

    let discovery = TriangleDiscovery::new(
        &config.stream.user_agent,
        Duration::from_secs(config.stream.connect_timeout_secs),
    )?;
    let triangles = discovery.discover(&quote).await?;

    println!("# Found {} {}-based triangles", triangles.len(), quote);
    for triangle in &triangles {
        println!();
        println!(
            "# {} -> {} -> {}",
            triangle.x_quote, triangle.cross, triangle.y_quote
        );
        print!("{}", triangle.to_toml()?);
    }

    Ok(())
}
