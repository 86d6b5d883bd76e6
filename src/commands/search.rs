//! Search command handler: query the catalog and print results.

use anyhow::Result;
use apkpure_core::ApkPure;

use crate::cli::SearchArgs;

pub async fn run_search_command(args: &SearchArgs) -> Result<()> {
    let client = ApkPure::new();

    if args.exact || args.top {
        let record = if args.exact {
            client.search_exact(&args.query).await?
        } else {
            client.search_top(&args.query).await?
        };
        if args.json {
            println!("{}", serde_json::to_string_pretty(&record)?);
        } else {
            println!("{record}");
        }
        return Ok(());
    }

    let results = client.search_all(&args.query).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }
    if results.is_empty() {
        println!("No results for '{}'.", args.query);
        return Ok(());
    }
    for record in &results {
        println!("{record}");
    }
    Ok(())
}
