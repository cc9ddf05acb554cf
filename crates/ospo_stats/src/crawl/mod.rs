//! Crawl orchestration: year-by-year discovery, per-repository history and
//! raw snapshots.
//!
//! # Module Structure
//!
//! - [`progress`] - Progress events and callback type
//! - [`types`] - Options and results
//! - [`discovery`] - Repository discovery by creation year
//! - [`history`] - Commit and stargazer history
//! - [`snapshot`] - Raw per-year JSON snapshots

mod discovery;
mod error;
mod history;
mod progress;
mod snapshot;
mod types;

pub use discovery::{discover, discover_year};
pub use error::CrawlError;
pub use history::{crawl_all_history, crawl_history, crawl_history_for};
pub use progress::{CrawlProgress, ProgressCallback, emit};
pub use snapshot::{
    ImportSummary, SnapshotError, import_snapshots, read_snapshot, snapshot_path, write_snapshot,
};
pub use types::{
    DEFAULT_YEAR_MIN, DiscoveryOptions, DiscoveryResult, HistoryFailure, HistoryOptions,
    HistoryOutcome, HistoryResult, YearSummary,
};
