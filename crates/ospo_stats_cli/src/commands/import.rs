use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use ospo_stats::crawl::import_snapshots;
use ospo_stats::gitlab::import_gitlab_csv;

use super::{CommandResult, connect};
use crate::progress::LoggingReporter;

pub(crate) async fn handle_import_snapshots(dir: &Path, database_url: &str) -> CommandResult {
    let db = connect(database_url).await?;
    let reporter = Arc::new(LoggingReporter::new());
    let callback = reporter.as_callback();

    let summary = import_snapshots(&db, dir, Utc::now(), Some(&callback)).await?;
    println!(
        "Imported {} snapshot file(s): {} repositories found, {} saved",
        summary.files, summary.found, summary.saved
    );
    Ok(())
}

pub(crate) async fn handle_import_gitlab(csv: &Path, database_url: &str) -> CommandResult {
    let db = connect(database_url).await?;
    let saved = import_gitlab_csv(&db, csv).await?;
    println!("Imported {} GitLab projects from {}", saved, csv.display());
    Ok(())
}
