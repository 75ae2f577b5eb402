//! The `crawl` subcommand: fetches every page and prints the merged record.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use schoolportal_lib::PortalConfig;

use crate::output::{print_crawl_table, print_json, OutputFormat};

#[derive(Args)]
pub struct CrawlArgs {
    /// Also write the record as JSON to this file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

pub async fn run(
    args: &CrawlArgs,
    config: PortalConfig,
    today: NaiveDate,
    format: &OutputFormat,
) -> Result<()> {
    let outcome = super::crawl_with_progress(config, today, args.quiet).await?;

    if let Some(ref path) = args.save {
        let json = serde_json::to_string_pretty(&outcome.record)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Saved record to {}", path.display());
    }

    match format {
        OutputFormat::Table => print_crawl_table(&outcome.record, &outcome.report),
        OutputFormat::Json => print_json(&outcome.record),
    }
    Ok(())
}
