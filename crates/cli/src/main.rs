//! gitmatch CLI entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;
mod commands;
mod config;

use args::{Cli, Commands};

/// Log level used when neither `--log-level` nor `RUST_LOG` is set
const DEFAULT_LOG_LEVEL: &str = "info";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        config, command, ..
    } = cli;

    match command {
        Commands::Find(args) => commands::find::execute(args, config).await,
        Commands::Fingerprint(args) => commands::fingerprint::execute(args).await,
        Commands::Config(args) => commands::config::execute(args).await,
        Commands::Doctor(args) => commands::doctor::execute(args, config).await,
    }
}

/// stdout carries match reports only, so all diagnostics go to stderr
fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_LEVEL))?,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();

    Ok(())
}
