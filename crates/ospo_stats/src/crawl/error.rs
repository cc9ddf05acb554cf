//! Errors at the crawl orchestrator boundary.

use thiserror::Error;

use crate::github::GitHubError;
use crate::parse::ParseError;
use crate::persist::PersistError;

use super::snapshot::SnapshotError;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl CrawlError {
    /// Persistence failures abort a multi-repository pass.
    pub fn is_persist(&self) -> bool {
        matches!(
            self,
            CrawlError::Persist(_) | CrawlError::Snapshot(SnapshotError::Persist(_))
        )
    }
}
