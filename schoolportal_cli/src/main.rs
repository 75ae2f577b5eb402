mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use schoolportal_lib::{validation, PortalConfig};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "schoolportal")]
#[command(about = "Crawl a school portal into one structured student record")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Config file (defaults to ./schoolportal.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Portal user id; skips landing-page discovery
    #[arg(long, global = true)]
    user_id: Option<String>,

    /// Portal base URL, e.g. https://portal.example.org
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Treat this day as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the pages a crawl would fetch, without fetching them
    Plan(commands::plan::PlanArgs),
    /// Crawl every page and print the merged record
    Crawl(commands::crawl::CrawlArgs),
    /// Crawl (or load a saved record) and submit it to the sync endpoint
    Sync(commands::sync::SyncArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("schoolportal=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let mut config = PortalConfig::load(cli.config.as_deref())?;
    if let Some(ref user_id) = cli.user_id {
        config.user_id = Some(validation::validate_user_id(user_id)?);
    }
    if let Some(ref base_url) = cli.base_url {
        config.base_url = Some(validation::validate_base_url(base_url)?);
    }
    let today = match cli.today {
        Some(ref day) => validation::validate_date(day)?,
        None => schoolportal_lib::extract::today(),
    };
    tracing::debug!("Using {} as today", today);

    match &cli.command {
        Commands::Plan(args) => commands::plan::run(args, config, today, &format)?,
        Commands::Crawl(args) => commands::crawl::run(args, config, today, &format).await?,
        Commands::Sync(args) => commands::sync::run(args, config, today, &format).await?,
    }

    Ok(())
}
