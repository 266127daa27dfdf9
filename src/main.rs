//! Churn - Entry Point
//!
//! Collects the run configuration from flags and prompts, then drives the
//! install/uninstall cycle loop until completion or Ctrl+C.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use churn::cli::{self, CliArgs};
use churn::command::CommandRunner;
use churn::cycle::CycleRunner;
use churn::npm::{npm_binary, NpmClient};
use churn::proxy::{load_proxies, PingProber};
use churn::workspace::WorkspaceManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "churn=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    cli::print_banner();

    let pool = load_proxies(&args.proxy_file);
    cli::print_pool_status(&args.proxy_file, pool.len());

    let config = cli::collect_config(&args, pool.len())?;
    cli::print_config(&config, pool.len());

    let runner = CommandRunner::new(npm_binary());
    let client = Arc::new(NpmClient::new(runner.clone()));
    let prober = Arc::new(PingProber::new(runner));
    let root = std::env::current_dir().context("cannot determine working directory")?;
    let cycle = CycleRunner::new(config, pool, client, prober, WorkspaceManager::new(root));

    tokio::select! {
        report = cycle.run() => {
            cli::print_report(&report?);
        }
        _ = signal::ctrl_c() => {
            // Dropping the run future drops any live workspace guard, so the
            // current iteration's directory is still cleaned up
            warn!("interrupted, shutting down");
            std::process::exit(130);
        }
    }

    Ok(())
}
