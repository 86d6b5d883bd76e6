//! Info command handler: show full metadata for one app.

use anyhow::Result;
use apkpure_core::ApkPure;

use crate::cli::InfoArgs;

pub async fn run_info_command(args: &InfoArgs) -> Result<()> {
    let client = ApkPure::new();
    let info = client.info(&args.title).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{info}");
    }
    Ok(())
}
