#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]

//! qbo-sync CLI
//!
//! Pulls Customer and Invoice pages from QuickBooks Online as JSON lines

use clap::Parser;
use qbo_sync::cli::{log_filter, Cli, Runner};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries records
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref(), cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
