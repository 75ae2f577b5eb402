//! CLI subcommand implementations.

pub mod crawl;
pub mod plan;
pub mod sync;

use anyhow::Result;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use schoolportal_lib::{CrawlOutcome, Crawler, PortalClient, PortalConfig};

/// Runs a full crawl, drawing a progress bar on stderr unless `quiet`.
pub async fn crawl_with_progress(
    config: PortalConfig,
    today: NaiveDate,
    quiet: bool,
) -> Result<CrawlOutcome> {
    let client = PortalClient::from_config(&config)?;
    let crawler = Crawler::new(client, config)?.with_today(today);

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    pb.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}/{len:3} {msg}",
    )?);
    pb.set_message("resolving user...");

    let outcome = crawler
        .run(|progress| {
            pb.set_length(progress.total as u64);
            pb.set_position(progress.index as u64);
            pb.set_message(progress.name.to_string());
        })
        .await;
    pb.finish_and_clear();

    let outcome = outcome?;
    let failed = outcome.report.failed().count();
    if failed > 0 {
        eprintln!(
            "Warning: {} of {} pages failed and were skipped",
            failed,
            outcome.report.pages.len()
        );
    }
    Ok(outcome)
}
