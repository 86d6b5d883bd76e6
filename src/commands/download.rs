//! Download command handler: fetch a package with a byte progress bar.

use anyhow::Result;
use apkpure_core::{ApkDownloader, ApkPure, ProgressSink};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::DownloadArgs;

pub async fn run_download_command(args: &DownloadArgs, quiet: bool) -> Result<()> {
    let client = match &args.output_dir {
        Some(dir) => ApkPure::new().with_downloader(ApkDownloader::with_root(dir)),
        None => ApkPure::new(),
    };
    let progress = if quiet {
        DownloadBar::hidden()
    } else {
        DownloadBar::new(&args.title)
    };

    let path = client
        .download(None, Some(&args.title), args.app_version.as_deref(), &progress)
        .await?;

    println!("Saved to {}", path.display());
    Ok(())
}

/// Byte progress bar for one package transfer.
///
/// A zero total (no content-length declared) still counts bytes; the bar
/// just cannot show a meaningful ETA then.
struct DownloadBar {
    bar: ProgressBar,
}

impl DownloadBar {
    fn new(label: &str) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        bar.set_message(label.to_string());
        Self { bar }
    }

    fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl ProgressSink for DownloadBar {
    fn begin(&self, total_bytes: u64) {
        self.bar.set_length(total_bytes);
    }

    fn advance(&self, delta_bytes: u64) {
        self.bar.inc(delta_bytes);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
