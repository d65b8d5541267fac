//! # Kepler Runtime
//!
//! Headless entry point. Logging goes through `tracing`; set `RUST_LOG` to
//! adjust verbosity (default `info`).

use anyhow::Result;
use clap::Parser;
use kepler::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    kepler::app::run(&cli)?;
    Ok(())
}
