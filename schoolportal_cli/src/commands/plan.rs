//! The `plan` subcommand: lists the crawl's pages in fetch order.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::Args;
use schoolportal_lib::schoolportal_api::Client;
use schoolportal_lib::{plan_pages, validation, PortalConfig};

use crate::output::{print_json, print_plan_table, OutputFormat};

#[derive(Args)]
pub struct PlanArgs {}

pub fn run(
    _args: &PlanArgs,
    config: PortalConfig,
    today: NaiveDate,
    format: &OutputFormat,
) -> Result<()> {
    let base_url = config
        .base_url
        .as_deref()
        .ok_or_else(|| anyhow!("no portal base URL configured (use --base-url)"))?;
    let user_id = config
        .user_id
        .ok_or_else(|| anyhow!("planning needs a user id (use --user-id)"))?;
    let urls = Client::new(&validation::validate_base_url(base_url)?);
    let pages = plan_pages(&urls, &config, user_id, today)?;

    match format {
        OutputFormat::Table => print_plan_table(&pages),
        OutputFormat::Json => print_json(&pages),
    }
    Ok(())
}
