//! dnmm-node: a demonstration host for the oracle-guided DNMM pipeline.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Oracle-guided DNMM demonstration node.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via DNMM_CONFIG env var).
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dnmm_telemetry::init_logging()?;

    let args = Args::parse();
    info!("starting dnmm-node v{}", env!("CARGO_PKG_VERSION"));

    let config = dnmm_node::NodeConfig::load(args.config)?;
    info!(pool_label = %config.pool_label, "configuration loaded");

    let app = dnmm_node::Application::new(config)?;
    app.run().await?;

    Ok(())
}
