//! Versions command handler: list an app's release history.

use anyhow::Result;
use apkpure_core::ApkPure;

use crate::cli::VersionsArgs;

pub async fn run_versions_command(args: &VersionsArgs) -> Result<()> {
    let client = ApkPure::new();
    let versions = client
        .versions(args.title.as_deref(), args.package.as_deref())
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&versions)?);
        return Ok(());
    }
    if versions.is_empty() {
        println!("No versions listed.");
        return Ok(());
    }
    for record in &versions {
        println!(
            "{} (build {})",
            record.package_version, record.package_version_code
        );
    }
    Ok(())
}
