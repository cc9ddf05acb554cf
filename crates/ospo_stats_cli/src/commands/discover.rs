use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use ospo_stats::crawl::{self, DiscoveryOptions};

use super::{CommandResult, connect, github_client};
use crate::config::Config;
use crate::progress::LoggingReporter;
use crate::shutdown::is_shutdown_requested;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DiscoverArgs {
    /// Search term(s), e.g. an institution domain
    #[arg(required = true)]
    pub terms: Vec<String>,

    /// First creation year to search (default from config or 2008)
    #[arg(long)]
    pub year_min: Option<i32>,

    /// Last creation year to search (default: current year)
    #[arg(long)]
    pub year_max: Option<i32>,

    /// Results per search page (default from config or 100)
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Write raw per-year snapshots to this directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Only write snapshots; don't save to the database
    #[arg(long)]
    pub no_persist: bool,
}

fn options_for(term: &str, args: &DiscoverArgs, config: &Config) -> DiscoveryOptions {
    DiscoveryOptions {
        year_min: args.year_min.unwrap_or(config.crawl.year_min),
        year_max: args.year_max.unwrap_or_else(|| Utc::now().year()),
        per_page: args.per_page.unwrap_or(config.crawl.per_page),
        output_dir: args
            .output_dir
            .clone()
            .or_else(|| config.crawl.output_dir.clone()),
        persist: !args.no_persist,
        ..DiscoveryOptions::new(term)
    }
}

pub(crate) async fn handle_discover(
    args: DiscoverArgs,
    config: &Config,
    database_url: &str,
) -> CommandResult {
    let client = github_client(config)?;
    let db = connect(database_url).await?;
    let reporter = Arc::new(LoggingReporter::new());
    let callback = reporter.as_callback();

    for term in &args.terms {
        if is_shutdown_requested() {
            tracing::warn!("Stopping before term {}", term);
            break;
        }

        let options = options_for(term, &args, config);
        if options.year_min > options.year_max {
            return Err(format!(
                "year_min ({}) is after year_max ({})",
                options.year_min, options.year_max
            )
            .into());
        }

        let result = crawl::discover(&client, &db, &options, Some(&callback)).await?;
        println!(
            "{}: {} repositories found, {} saved across {} year(s)",
            result.term,
            result.total_found(),
            result.total_saved(),
            result.years.len()
        );
    }

    Ok(())
}
