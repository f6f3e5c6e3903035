//! `aicart serve` - Run the HTTP server.

use aicart_core::AicartConfig;
use anyhow::Context;
use std::path::PathBuf;

pub async fn run(config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = AicartConfig::load(config.as_deref()).context("Failed to load configuration")?;
    tracing::info!(bind = %config.server.bind, "starting aicart server");
    aicart_server::serve(config).await
}
