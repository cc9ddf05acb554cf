//! Progress reporting for crawl operations.
//!
//! Library events are rendered as structured log lines. Events the library
//! already logs at info level are repeated here at debug level only.

use std::sync::Arc;

use ospo_stats::crawl::{CrawlProgress, ProgressCallback};

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    /// Convert to a ProgressCallback for the library.
    pub fn as_callback(self: &Arc<Self>) -> ProgressCallback {
        let reporter = Arc::clone(self);
        Box::new(move |event| reporter.handle(event))
    }

    pub fn handle(&self, event: CrawlProgress) {
        match event {
            CrawlProgress::DiscoveringYear { term, year } => {
                tracing::debug!(term = %term, year, "Discovering year");
            }

            CrawlProgress::FetchedPage {
                resource,
                page,
                count,
                total_so_far,
                reported_total,
            } => {
                tracing::info!(
                    resource = %resource,
                    page,
                    count,
                    total_so_far,
                    reported_total = ?reported_total,
                    "Fetched page"
                );
            }

            CrawlProgress::YearComplete {
                term,
                year,
                found,
                saved,
            } => {
                tracing::debug!(term = %term, year, found, saved, "Year complete");
            }

            CrawlProgress::SnapshotWritten { path, count } => {
                tracing::info!(path = %path.display(), count, "Snapshot written");
            }

            CrawlProgress::SnapshotImported { path, found, saved } => {
                tracing::debug!(path = %path.display(), found, saved, "Snapshot imported");
            }

            CrawlProgress::HistorySkipped { repo_url } => {
                tracing::debug!(repo_url = %repo_url, "History skipped");
            }

            CrawlProgress::HistoryCrawled {
                repo_url,
                commits,
                stargazers,
            } => {
                tracing::debug!(repo_url = %repo_url, commits, stargazers, "History crawled");
            }

            CrawlProgress::HistoryFailed { repo_url, error } => {
                tracing::debug!(repo_url = %repo_url, error = %error, "History failed");
            }

            CrawlProgress::RetryBackoff {
                context,
                retry_after_ms,
                attempt,
            } => {
                tracing::warn!(
                    context = %context,
                    retry_after_ms,
                    attempt,
                    "Request failed, backing off"
                );
            }

            CrawlProgress::Classified { repo_url, category } => {
                tracing::info!(repo_url = %repo_url, category = %category, "Classified");
            }

            CrawlProgress::ClassifyFailed { repo_url, error } => {
                tracing::debug!(repo_url = %repo_url, error = %error, "Classification failed");
            }

            CrawlProgress::EnrichedBatch {
                batch,
                total_batches,
                count,
            } => {
                tracing::info!(batch, total_batches, count, "Enriched batch");
            }

            CrawlProgress::Warning { message } => {
                tracing::warn!("{}", message);
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
