//! Reading GitLab project exports and persisting them.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::entity::repository;
use crate::persist::upsert_repositories;

use super::convert::{GitLabProjectRow, to_repository};
use super::error::GitLabImportError;

/// Parse every row of a project export.
pub fn parse_reader<R: Read>(
    reader: R,
    crawl_at: DateTime<Utc>,
) -> Result<Vec<repository::Model>, GitLabImportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut models = Vec::new();

    for (index, record) in csv_reader.deserialize::<GitLabProjectRow>().enumerate() {
        let row = record?;
        let model = to_repository(row, crawl_at).map_err(|source| GitLabImportError::Parse {
            row: index + 1,
            source,
        })?;
        models.push(model);
    }

    Ok(models)
}

/// Parse a project export file. The crawl time is the file's modification time.
pub fn parse_csv(path: &Path) -> Result<Vec<repository::Model>, GitLabImportError> {
    let crawl_at: DateTime<Utc> = std::fs::metadata(path)?.modified()?.into();
    let file = std::fs::File::open(path)?;
    parse_reader(file, crawl_at)
}

/// Parse a project export file and upsert every row.
///
/// Returns the number of repositories written.
pub async fn import_gitlab_csv(
    db: &DatabaseConnection,
    path: &Path,
) -> Result<u64, GitLabImportError> {
    let models = parse_csv(path)?;
    tracing::info!(path = %path.display(), count = models.len(), "Parsed GitLab export");
    Ok(upsert_repositories(db, models).await?)
}
