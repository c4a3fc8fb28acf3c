use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kongswap_trading::app;
use kongswap_trading::application::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the views, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app_cfg = app::AppCfg::resolve(&cli)?;

    app::run(app_cfg, cli.command).await
}
