//! Progress reporting types for crawl operations.
//!
//! Library code never prints. It emits [`CrawlProgress`] events through an
//! optional callback and leaves rendering to the caller (the CLI maps every
//! event to a `tracing` call).

use std::path::PathBuf;

/// Progress events emitted during crawl, import and enrichment passes.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum CrawlProgress {
    /// Starting discovery for one creation year.
    DiscoveringYear {
        /// Search term.
        term: String,
        /// Creation year being searched.
        year: i32,
    },

    /// Fetched one page of a paginated resource.
    FetchedPage {
        /// Human-readable resource label (e.g. `repos "wisc" 2019`).
        resource: String,
        /// Page number (1-indexed).
        page: u32,
        /// Number of items on this page.
        count: usize,
        /// Running total of items fetched so far.
        total_so_far: usize,
        /// Total reported by the source on this page.
        reported_total: u64,
    },

    /// Finished discovery for one year.
    YearComplete {
        /// Search term.
        term: String,
        /// Creation year.
        year: i32,
        /// Raw repositories found.
        found: usize,
        /// Repositories persisted (non-empty ones).
        saved: usize,
    },

    /// Wrote a JSON snapshot file.
    SnapshotWritten {
        /// Path of the snapshot.
        path: PathBuf,
        /// Number of raw edges written.
        count: usize,
    },

    /// Re-imported one snapshot file.
    SnapshotImported {
        /// Path of the snapshot.
        path: PathBuf,
        /// Raw edges read.
        found: usize,
        /// Repositories persisted.
        saved: usize,
    },

    /// A history crawl was skipped because rows already exist.
    HistorySkipped {
        /// Repository URL.
        repo_url: String,
    },

    /// A history crawl finished.
    HistoryCrawled {
        /// Repository URL.
        repo_url: String,
        /// Commits persisted.
        commits: usize,
        /// Stargazer events persisted.
        stargazers: usize,
    },

    /// A history crawl failed; the batch continues.
    HistoryFailed {
        /// Repository URL.
        repo_url: String,
        /// Error message.
        error: String,
    },

    /// A transient failure is being retried after a backoff.
    RetryBackoff {
        /// What is being retried.
        context: String,
        /// Delay before the next attempt, in milliseconds.
        retry_after_ms: u64,
        /// The attempt that just failed (1-indexed).
        attempt: u32,
    },

    /// A repository was classified.
    Classified {
        /// Repository URL.
        repo_url: String,
        /// Assigned label.
        category: String,
    },

    /// Classification failed; the record keeps its previous category.
    ClassifyFailed {
        /// Repository URL.
        repo_url: String,
        /// Error message.
        error: String,
    },

    /// One enrichment batch was written.
    EnrichedBatch {
        /// Batch number (1-indexed).
        batch: u64,
        /// Total batches.
        total_batches: u64,
        /// Records in the batch.
        count: usize,
    },

    /// Non-fatal warning.
    Warning {
        /// Warning message.
        message: String,
    },
}

/// Callback type for progress reporting.
pub type ProgressCallback = Box<dyn Fn(CrawlProgress) + Send + Sync>;

/// Emit a progress event if a callback is registered.
#[inline]
pub fn emit(callback: Option<&ProgressCallback>, event: CrawlProgress) {
    if let Some(cb) = callback {
        cb(event);
    }
}
