//! stackshift - gesture-driven slot transfers
//!
//! Runs a scripted gesture scenario against a simulated authoritative peer
//! and prints the resulting container.

mod config;
mod scenario;

use anyhow::{Context, Result};
use clap::Parser;
use config::AppConfig;
use scenario::{Runner, Scenario};
use stackshift_testkit::JsonlSink;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run gesture scenarios against a simulated peer", long_about = None)]
struct Args {
    /// Scenario file (JSON)
    #[arg(long)]
    scenario: PathBuf,
    /// Configuration file (TOML); defaults to config/stackshift.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write every operation sent to the peer as JSON lines
    #[arg(long)]
    log: Option<PathBuf>,
    /// Save the effective configuration to this path
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    info!("Starting stackshift v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    };
    if let Some(path) = &args.save_config {
        config
            .save_to_path(path)
            .with_context(|| format!("failed to save config to {}", path.display()))?;
    }

    let scenario = Scenario::load(&args.scenario)?;
    let mut runner = Runner::new(&config, &scenario)?;
    let handled = runner.run(&scenario)?;

    if let Some(path) = &args.log {
        let mut sink =
            JsonlSink::create(path).with_context(|| format!("failed to create op log {}", path.display()))?;
        sink.write_ops(runner.bench().ops())?;
    }

    println!("{handled}/{} steps handled", scenario.steps.len());
    println!("{}", runner.report());
    Ok(())
}
