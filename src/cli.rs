//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Search, inspect, and download Android packages from the APKPure catalog.
#[derive(Parser, Debug)]
#[command(name = "apkpure")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the catalog for apps
    Search(SearchArgs),
    /// List an app's version history, newest first
    Versions(VersionsArgs),
    /// Show full metadata for an app
    Info(InfoArgs),
    /// Download an app package
    Download(DownloadArgs),
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// App name to search for
    pub query: String,

    /// Print only the result whose title matches the query exactly
    #[arg(long, conflicts_with = "top")]
    pub exact: bool,

    /// Print only the page's first/best match
    #[arg(long)]
    pub top: bool,

    /// Emit results as JSON instead of text rows
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct VersionsArgs {
    /// App title to resolve
    #[arg(long, required_unless_present = "package")]
    pub title: Option<String>,

    /// Package name to resolve (takes precedence over --title)
    #[arg(long)]
    pub package: Option<String>,

    /// Emit results as JSON instead of text rows
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct InfoArgs {
    /// Exact app title
    pub title: String,

    /// Emit the record as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// Exact app title
    pub title: String,

    /// Specific version to download (defaults to the latest listed)
    #[arg(long)]
    pub app_version: Option<String>,

    /// Directory that receives the apks/ output directory (defaults to the current directory)
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,
}
