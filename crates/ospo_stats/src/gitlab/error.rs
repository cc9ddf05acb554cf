//! Error types for GitLab CSV imports.

use thiserror::Error;

use crate::parse::ParseError;
use crate::persist::PersistError;

/// Errors that can occur while importing a GitLab project export.
#[derive(Debug, Error)]
pub enum GitLabImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row could not be converted. `row` is 1-indexed, header excluded.
    #[error("row {row}: {source}")]
    Parse {
        row: usize,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Persist(#[from] PersistError),
}
