use std::sync::Arc;

use ospo_stats::crawl::{self, HistoryOptions, HistoryResult};
use ospo_stats::persist::list_repository_urls;

use super::{CommandResult, connect, github_client};
use crate::config::Config;
use crate::progress::LoggingReporter;
use crate::shutdown::is_shutdown_requested;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HistoryArgs {
    /// Repository URL(s) to crawl (default: every stored repository)
    #[arg(long = "url")]
    pub urls: Vec<String>,

    /// Re-crawl repositories that already have commit history
    #[arg(long)]
    pub no_skip_existing: bool,
}

pub(crate) async fn handle_history(
    args: HistoryArgs,
    config: &Config,
    database_url: &str,
) -> CommandResult {
    let client = github_client(config)?;
    let db = connect(database_url).await?;
    let reporter = Arc::new(LoggingReporter::new());
    let callback = reporter.as_callback();

    let options = HistoryOptions {
        skip_existing: !args.no_skip_existing,
    };
    let urls = if args.urls.is_empty() {
        list_repository_urls(&db).await?
    } else {
        args.urls
    };

    // One repository at a time so Ctrl+C stops between repositories.
    let mut total = HistoryResult::default();
    for url in &urls {
        if is_shutdown_requested() {
            tracing::warn!("Stopping before {}", url);
            break;
        }
        let result =
            crawl::crawl_history_for(&client, &db, std::slice::from_ref(url), &options, Some(&callback))
                .await?;
        total.crawled += result.crawled;
        total.skipped += result.skipped;
        total.commits += result.commits;
        total.stargazers += result.stargazers;
        total.errors.extend(result.errors);
    }

    println!(
        "History: {} crawled, {} skipped, {} failed ({} commits, {} stargazers)",
        total.crawled,
        total.skipped,
        total.errors.len(),
        total.commits,
        total.stargazers
    );
    for failure in &total.errors {
        println!("  {}: {}", failure.repo_url, failure.error);
    }

    Ok(())
}
