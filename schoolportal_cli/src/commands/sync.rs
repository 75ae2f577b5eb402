//! The `sync` subcommand: submits a record to the sync endpoint.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::Args;
use schoolportal_lib::types::AggregateRecord;
use schoolportal_lib::{PortalConfig, SyncClient};

use crate::output::{login_token, print_json, OutputFormat};

#[derive(Args)]
pub struct SyncArgs {
    /// Submit a record saved by `crawl --save` instead of crawling
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Sync endpoint URL (overrides config and SCHOOLPORTAL_SYNC_URL)
    #[arg(long)]
    pub sync_url: Option<String>,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

pub async fn run(
    args: &SyncArgs,
    config: PortalConfig,
    today: NaiveDate,
    format: &OutputFormat,
) -> Result<()> {
    let endpoint = args
        .sync_url
        .clone()
        .or_else(|| config.sync_url.clone())
        .ok_or_else(|| anyhow!("no sync endpoint configured (use --sync-url)"))?;
    let mut client = SyncClient::new(&endpoint);
    if let Some(ref token) = config.sync_token {
        client = client.with_bearer_token(token);
    }

    let record: AggregateRecord = match args.from {
        Some(ref path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("{} is not a saved record", path.display()))?
        }
        None => {
            super::crawl_with_progress(config, today, args.quiet)
                .await?
                .record
        }
    };

    eprintln!(
        "Submitting record for user {} to {}",
        record.user.user_id, endpoint
    );
    let reply = client.submit(&record).await?;

    match format {
        OutputFormat::Json => print_json(&reply),
        OutputFormat::Table => match login_token(&reply) {
            Some(token) => println!("Sync complete. Login token: {}", token),
            None => println!("Sync complete."),
        },
    }
    Ok(())
}
