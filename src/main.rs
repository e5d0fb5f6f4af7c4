use anyhow::Result;
use clap::Parser;
use pos_terminal::{
    cli::{Args, CliApp},
    utils::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.config {
        dotenv::from_filename(path).map_err(|e| anyhow::anyhow!("Cannot load {}: {}", path, e))?;
    }

    let config = Config::from_env()?;

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("🦀 POS terminal starting...");
    tracing::info!(
        "Configuration loaded for {} environment",
        config.environment
    );

    let mut app = CliApp::new(config)?;
    let result = app.run(args).await;
    if let Err(e) = &result {
        tracing::error!("Command failed: {:#}", e);
    }

    tracing::info!("🦀 POS terminal stopped");
    result
}
