//! Commit and stargazer history crawls.

use sea_orm::DatabaseConnection;

use crate::github::{
    CommitsQuery, GraphQlExecutor, Paginator, StargazersQuery, to_commit, to_stargazer,
};
use crate::parse::owner_and_name;
use crate::persist::{has_commit_history, list_repository_urls, upsert_commits, upsert_stargazers};

use super::error::CrawlError;
use super::progress::{CrawlProgress, ProgressCallback, emit};
use super::types::{HistoryFailure, HistoryOptions, HistoryOutcome, HistoryResult};

/// Crawl the full commit and stargazer history of one repository.
///
/// With `skip_existing`, a repository that already has any commit row is
/// skipped without a single request.
pub async fn crawl_history(
    executor: &dyn GraphQlExecutor,
    db: &DatabaseConnection,
    repo_url: &str,
    options: &HistoryOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<HistoryOutcome, CrawlError> {
    if options.skip_existing && has_commit_history(db, repo_url).await? {
        tracing::info!(repo_url, "History already stored, skipping");
        emit(
            on_progress,
            CrawlProgress::HistorySkipped {
                repo_url: repo_url.to_string(),
            },
        );
        return Ok(HistoryOutcome::Skipped);
    }

    let (owner, name) = owner_and_name(repo_url)?;
    tracing::info!(repo_url, "Crawling history");

    let commit_edges = Paginator::new(
        executor,
        CommitsQuery {
            owner: owner.clone(),
            name: name.clone(),
        },
    )
    .with_progress(on_progress)
    .collect_all()
    .await?;

    let stargazer_edges = Paginator::new(executor, StargazersQuery { owner, name })
        .with_progress(on_progress)
        .collect_all()
        .await?;

    let commits = commit_edges
        .into_iter()
        .map(|edge| to_commit(edge, repo_url))
        .collect::<Result<Vec<_>, _>>()?;
    let stargazers = stargazer_edges
        .into_iter()
        .map(|edge| to_stargazer(edge, repo_url))
        .collect::<Result<Vec<_>, _>>()?;

    let commits = upsert_commits(db, commits).await? as usize;
    let stargazers = upsert_stargazers(db, stargazers).await? as usize;

    tracing::info!(repo_url, commits, stargazers, "History crawled");
    emit(
        on_progress,
        CrawlProgress::HistoryCrawled {
            repo_url: repo_url.to_string(),
            commits,
            stargazers,
        },
    );

    Ok(HistoryOutcome::Crawled {
        commits,
        stargazers,
    })
}

/// Crawl history for every stored repository, in URL order.
pub async fn crawl_all_history(
    executor: &dyn GraphQlExecutor,
    db: &DatabaseConnection,
    options: &HistoryOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<HistoryResult, CrawlError> {
    let urls = list_repository_urls(db).await?;
    tracing::info!(repositories = urls.len(), "Starting history pass");
    crawl_history_for(executor, db, &urls, options, on_progress).await
}

/// Crawl history for the given repositories.
///
/// A failing repository is logged and recorded, and the pass moves on.
/// Database failures end the pass.
pub async fn crawl_history_for(
    executor: &dyn GraphQlExecutor,
    db: &DatabaseConnection,
    repo_urls: &[String],
    options: &HistoryOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<HistoryResult, CrawlError> {
    let mut result = HistoryResult::default();

    for repo_url in repo_urls {
        match crawl_history(executor, db, repo_url, options, on_progress).await {
            Ok(outcome) => result.record(outcome),
            Err(e) if e.is_persist() => return Err(e),
            Err(e) => {
                tracing::error!(repo_url = %repo_url, error = %e, "History crawl failed");
                emit(
                    on_progress,
                    CrawlProgress::HistoryFailed {
                        repo_url: repo_url.clone(),
                        error: e.to_string(),
                    },
                );
                result.errors.push(HistoryFailure {
                    repo_url: repo_url.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        crawled = result.crawled,
        skipped = result.skipped,
        failed = result.errors.len(),
        "History pass complete"
    );
    Ok(result)
}
