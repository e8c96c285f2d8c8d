//! Premium Estimator - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, ServiceConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::load().context("loading configuration")?;
    init_logging(&config.logging)?;

    info!("=== Premium Estimator v{} ===", env!("CARGO_PKG_VERSION"));

    run_server(&config).await
}
