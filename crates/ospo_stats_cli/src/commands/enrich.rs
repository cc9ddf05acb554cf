use std::sync::Arc;

use ospo_stats::enrich::{AnthropicClassifier, ClassifyOptions, EnrichOptions, enrich_repositories};

use super::{CommandResult, connect};
use crate::config::Config;
use crate::progress::LoggingReporter;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EnrichArgs {
    /// Records classified concurrently per batch (default from config or 10)
    #[arg(short, long)]
    pub batch_size: Option<u64>,

    /// Re-classify records that already have a category
    #[arg(long)]
    pub overwrite: bool,
}

pub(crate) async fn handle_enrich(args: EnrichArgs, config: &Config, database_url: &str) -> CommandResult {
    let api_key = config.anthropic_api_key().ok_or(
        "Anthropic API key not configured. Set OSPO_ANTHROPIC_API_KEY or ANTHROPIC_API_KEY",
    )?;
    let classifier = AnthropicClassifier::new(&api_key)?.with_model(config.anthropic.model.clone());
    tracing::debug!(model = classifier.model(), "Classifier ready");
    let db = connect(database_url).await?;

    let options = EnrichOptions {
        batch_size: args.batch_size.unwrap_or(config.enrich.batch_size),
        overwrite: args.overwrite,
        classify: ClassifyOptions {
            labels: config.enrich.labels.clone(),
            ..ClassifyOptions::default()
        },
    };

    let reporter = Arc::new(LoggingReporter::new());
    let callback = reporter.as_callback();
    let summary = enrich_repositories(&db, &classifier, &options, Some(&callback)).await?;

    println!(
        "Enriched {} repositories in {} batch(es): {} classified, {} failed",
        summary.processed, summary.batches, summary.classified, summary.failed
    );
    Ok(())
}
