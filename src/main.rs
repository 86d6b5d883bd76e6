//! CLI entry point for the APKPure catalog tool.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod cli;
mod commands;

use cli::{Args, Command};
use commands::{
    run_download_command, run_info_command, run_search_command, run_versions_command,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    match &args.command {
        Command::Search(search_args) => run_search_command(search_args).await,
        Command::Versions(versions_args) => run_versions_command(versions_args).await,
        Command::Info(info_args) => run_info_command(info_args).await,
        Command::Download(download_args) => run_download_command(download_args, args.quiet).await,
    }
}
