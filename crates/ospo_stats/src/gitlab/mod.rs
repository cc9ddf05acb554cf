//! GitLab project export import.
//!
//! GitLab repositories are not crawled over an API; they are loaded from the
//! CSV export of the instance's project list.

mod convert;
mod error;
mod import;

pub use convert::{GITLAB_TIMESTAMP_FORMAT, GitLabProjectRow, to_repository};
pub use error::GitLabImportError;
pub use import::{import_gitlab_csv, parse_csv, parse_reader};
