use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use hostpulse::cli::Args;
use hostpulse::config;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let args = Args::parse();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "hostpulse starting");

    let loaded = match &args.config {
        Some(path) => config::load_from_file(path),
        None => config::load_from_str(""),
    };
    let cfg = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, path = ?args.config, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    if args.check {
        tracing::info!("configuration ok");
        return ExitCode::SUCCESS;
    }

    match hostpulse::run::run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "monitor failed");
            ExitCode::FAILURE
        }
    }
}
