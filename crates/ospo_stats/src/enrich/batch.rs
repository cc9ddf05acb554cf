//! Batched enrichment of stored repositories.

use futures::future::join_all;
use sea_orm::DatabaseConnection;

use crate::crawl::{CrawlProgress, ProgressCallback, emit};
use crate::entity::repository;
use crate::parse::activity_flag;
use crate::persist::{self, count_repositories, find_repositories_page, upsert_repositories};

use super::classifier::{Classifier, ClassifyOptions};

/// Records per page when no batch size is configured.
pub const DEFAULT_ENRICH_BATCH_SIZE: u64 = 10;

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Records read, classified concurrently and written per page.
    pub batch_size: u64,
    /// Re-classify records that already have a category.
    pub overwrite: bool,
    pub classify: ClassifyOptions,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_ENRICH_BATCH_SIZE,
            overwrite: false,
            classify: ClassifyOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub batches: u64,
    /// Records read and written back.
    pub processed: usize,
    pub classified: usize,
    pub failed: usize,
}

enum Classification {
    Kept,
    Assigned,
    Failed,
}

async fn enrich_one(
    mut repo: repository::Model,
    classifier: &dyn Classifier,
    options: &EnrichOptions,
    on_progress: Option<&ProgressCallback>,
) -> (repository::Model, Classification) {
    if let Some(active) = activity_flag(repo.crawl_at, repo.last_pushed_at) {
        repo.is_active = Some(active);
    }

    if repo.category.is_some() && !options.overwrite {
        return (repo, Classification::Kept);
    }

    match classifier.categorize(&repo.classifier_text(), &options.classify).await {
        Ok(category) => {
            tracing::debug!(repo_url = %repo.url, %category, "Classified repository");
            emit(
                on_progress,
                CrawlProgress::Classified {
                    repo_url: repo.url.clone(),
                    category: category.clone(),
                },
            );
            repo.category = Some(category);
            (repo, Classification::Assigned)
        }
        Err(e) => {
            tracing::warn!(repo_url = %repo.url, error = %e, "Classification failed");
            emit(
                on_progress,
                CrawlProgress::ClassifyFailed {
                    repo_url: repo.url.clone(),
                    error: e.to_string(),
                },
            );
            (repo, Classification::Failed)
        }
    }
}

/// Walk the repository table in URL order, refreshing the activity flag and
/// classifying records without a category (every record with `overwrite`).
///
/// Classifier calls within one page run concurrently. A failed call leaves
/// the record's category unchanged. Each page is written back before the
/// next one is read.
pub async fn enrich_repositories(
    db: &DatabaseConnection,
    classifier: &dyn Classifier,
    options: &EnrichOptions,
    on_progress: Option<&ProgressCallback>,
) -> persist::Result<EnrichSummary> {
    let batch_size = options.batch_size.max(1);
    let total = count_repositories(db).await?;
    let total_batches = total.div_ceil(batch_size);
    tracing::info!(total, total_batches, "Enriching repositories");

    let mut summary = EnrichSummary::default();

    for batch in 0..total_batches {
        let page = find_repositories_page(db, batch * batch_size, batch_size).await?;
        if page.is_empty() {
            break;
        }

        let results = join_all(
            page.into_iter()
                .map(|repo| enrich_one(repo, classifier, options, on_progress)),
        )
        .await;

        let mut models = Vec::with_capacity(results.len());
        for (model, classification) in results {
            match classification {
                Classification::Assigned => summary.classified += 1,
                Classification::Failed => summary.failed += 1,
                Classification::Kept => {}
            }
            models.push(model);
        }

        let count = models.len();
        upsert_repositories(db, models).await?;
        summary.batches += 1;
        summary.processed += count;

        emit(
            on_progress,
            CrawlProgress::EnrichedBatch {
                batch: batch + 1,
                total_batches,
                count,
            },
        );
    }

    tracing::info!(
        processed = summary.processed,
        classified = summary.classified,
        failed = summary.failed,
        "Enrichment complete"
    );
    Ok(summary)
}
