//! Raw per-year discovery snapshots.
//!
//! A snapshot is the JSON array of search edges exactly as returned, written
//! to `repos_<term>_<year>.json` before any decoding. Snapshots can be
//! re-imported offline; the edges are checked against the schema then.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use thiserror::Error;

use crate::github::{decode_repo_edges, to_repositories};
use crate::parse::ParseError;
use crate::persist::{PersistError, upsert_repositories};

use super::progress::{CrawlProgress, ProgressCallback, emit};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Persist(#[from] PersistError),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SnapshotError + '_ {
    move |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Snapshot location for one term and year. Path separators in the term are
/// replaced so the file always lands directly in `dir`.
pub fn snapshot_path(dir: &Path, term: &str, year: i32) -> PathBuf {
    let term: String = term
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    dir.join(format!("repos_{term}_{year}.json"))
}

/// Write raw `edges` as a 4-space indented JSON array, creating `dir` if needed.
pub fn write_snapshot(
    dir: &Path,
    term: &str,
    year: i32,
    edges: &[serde_json::Value],
) -> Result<PathBuf, SnapshotError> {
    std::fs::create_dir_all(dir).map_err(io_error(dir))?;
    let path = snapshot_path(dir, term, year);

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    edges
        .serialize(&mut serializer)
        .map_err(|source| SnapshotError::Json {
            path: path.clone(),
            source,
        })?;

    std::fs::write(&path, buf).map_err(io_error(&path))?;
    Ok(path)
}

/// Read the raw edges of one snapshot file. The file must hold a JSON array.
pub fn read_snapshot(path: &Path) -> Result<Vec<serde_json::Value>, SnapshotError> {
    let bytes = std::fs::read(path).map_err(io_error(path))?;
    serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Outcome of re-importing a snapshot directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub files: usize,
    /// Raw edges read, empty repositories included.
    pub found: usize,
    pub saved: usize,
}

/// Parse every `*.json` snapshot in `dir` (in file-name order) and upsert the
/// repositories, stamped with `crawl_at`.
pub async fn import_snapshots(
    db: &DatabaseConnection,
    dir: &Path,
    crawl_at: DateTime<Utc>,
    on_progress: Option<&ProgressCallback>,
) -> Result<ImportSummary, SnapshotError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(io_error(dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    let mut summary = ImportSummary::default();
    for path in files {
        let raw = read_snapshot(&path)?;
        let found = raw.len();
        let models = decode_repo_edges(raw)
            .and_then(|edges| to_repositories(edges, crawl_at))
            .map_err(|source| SnapshotError::Parse {
                path: path.clone(),
                source,
            })?;
        let saved = upsert_repositories(db, models).await? as usize;

        tracing::info!(path = %path.display(), found, saved, "Imported snapshot");
        emit(
            on_progress,
            CrawlProgress::SnapshotImported {
                path: path.clone(),
                found,
                saved,
            },
        );

        summary.files += 1;
        summary.found += found;
        summary.saved += saved;
    }

    Ok(summary)
}
