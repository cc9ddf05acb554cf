//! Year-by-year repository discovery.
//!
//! GitHub's search returns at most 1000 results per query, so a term is
//! searched once per creation year and every year is paginated to the end.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::github::{
    DiscoveryQuery, GitHubError, GraphQlExecutor, Paginator, decode_repo_edges, to_repositories,
};
use crate::persist::upsert_repositories;

use super::error::CrawlError;
use super::progress::{CrawlProgress, ProgressCallback, emit};
use super::snapshot::write_snapshot;
use super::types::{DiscoveryOptions, DiscoveryResult, YearSummary};

/// Every raw search edge for `term` among repositories created in `year`.
///
/// Edges are returned undecoded; see [`decode_repo_edges`].
pub async fn discover_year(
    executor: &dyn GraphQlExecutor,
    term: &str,
    year: i32,
    per_page: u32,
    on_progress: Option<&ProgressCallback>,
) -> Result<Vec<serde_json::Value>, GitHubError> {
    let query = DiscoveryQuery {
        term: term.to_string(),
        year,
        per_page,
    };
    Paginator::new(executor, query)
        .with_progress(on_progress)
        .collect_all()
        .await
}

/// Crawl every year in `options.year_min..=options.year_max`.
///
/// Years without results are skipped. Each year is snapshotted (when an
/// output directory is set) before its edges are decoded, so a schema
/// mismatch still leaves the raw payload on disk.
pub async fn discover(
    executor: &dyn GraphQlExecutor,
    db: &DatabaseConnection,
    options: &DiscoveryOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<DiscoveryResult, CrawlError> {
    let mut result = DiscoveryResult {
        term: options.term.clone(),
        years: Vec::new(),
    };

    for year in options.year_min..=options.year_max {
        tracing::info!(term = %options.term, year, "Discovering repositories");
        emit(
            on_progress,
            CrawlProgress::DiscoveringYear {
                term: options.term.clone(),
                year,
            },
        );

        let edges = discover_year(executor, &options.term, year, options.per_page, on_progress).await?;
        if edges.is_empty() {
            tracing::debug!(year, "No repositories found");
            continue;
        }
        let found = edges.len();

        let snapshot = match &options.output_dir {
            Some(dir) => {
                let path = write_snapshot(dir, &options.term, year, &edges)?;
                tracing::debug!(path = %path.display(), "Wrote snapshot");
                emit(
                    on_progress,
                    CrawlProgress::SnapshotWritten {
                        path: path.clone(),
                        count: found,
                    },
                );
                Some(path)
            }
            None => None,
        };

        let edges = decode_repo_edges(edges)?;
        let saved = if options.persist {
            let models = to_repositories(edges, Utc::now())?;
            upsert_repositories(db, models).await? as usize
        } else {
            0
        };

        tracing::info!(year, found, saved, "Year complete");
        emit(
            on_progress,
            CrawlProgress::YearComplete {
                term: options.term.clone(),
                year,
                found,
                saved,
            },
        );

        result.years.push(YearSummary {
            year,
            found,
            saved,
            snapshot,
        });
    }

    Ok(result)
}
