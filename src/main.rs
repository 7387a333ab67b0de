use streamsplit::cli::Args;
use streamsplit::{App, Config};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting streamsplit recorder");

    // Load configuration
    let args = Args::parse();
    let config = Config::from_args(&args)?;
    config.validate()?;

    App::new(config)?.run().await
}
