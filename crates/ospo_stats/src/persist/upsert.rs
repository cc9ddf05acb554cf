use std::collections::HashMap;
use std::hash::Hash;

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, TransactionTrait,
    sea_query::OnConflict,
};

use crate::entity::{commit, repository, stargazer};

use super::errors::Result;

/// Records written per transaction.
pub const UPSERT_BATCH_SIZE: usize = 100;

/// Merge repositories by URL, overwriting every stored column.
///
/// Returns the number of distinct records written.
pub async fn upsert_repositories(
    db: &DatabaseConnection,
    models: Vec<repository::Model>,
) -> Result<u64> {
    let models = dedupe_by_key(models, |m| m.url.clone());
    let active: Vec<repository::ActiveModel> = models.into_iter().map(into_set).collect();
    upsert_in_batches(db, active, repository_on_conflict(), UPSERT_BATCH_SIZE).await
}

/// Merge commits by commit URL.
pub async fn upsert_commits(db: &DatabaseConnection, models: Vec<commit::Model>) -> Result<u64> {
    let models = dedupe_by_key(models, |m| m.url.clone());
    let active: Vec<commit::ActiveModel> = models.into_iter().map(into_set).collect();
    upsert_in_batches(db, active, commit_on_conflict(), UPSERT_BATCH_SIZE).await
}

/// Merge stargazer events by their composite id.
pub async fn upsert_stargazers(
    db: &DatabaseConnection,
    models: Vec<stargazer::Model>,
) -> Result<u64> {
    let models = dedupe_by_key(models, |m| m.id.clone());
    let active: Vec<stargazer::ActiveModel> = models.into_iter().map(into_set).collect();
    upsert_in_batches(db, active, stargazer_on_conflict(), UPSERT_BATCH_SIZE).await
}

/// ON CONFLICT clause for `repo`: full overwrite of every non-key column.
pub fn repository_on_conflict() -> OnConflict {
    use repository::Column;

    OnConflict::column(Column::Url)
        .update_columns([
            Column::CrawlAt,
            Column::Owner,
            Column::Name,
            Column::Description,
            Column::HomepageUrl,
            Column::LicenseKey,
            Column::LicenseName,
            Column::Readme,
            Column::ReadmeHasImage,
            Column::CreatedAt,
            Column::LastPushedAt,
            Column::TotalStargazerCount,
            Column::TotalIssuesCount,
            Column::TotalOpenIssuesCount,
            Column::TotalForksCount,
            Column::TotalWatchersCount,
            Column::IsActive,
            Column::Category,
        ])
        .to_owned()
}

/// ON CONFLICT clause for `commit_history`.
pub fn commit_on_conflict() -> OnConflict {
    use commit::Column;

    OnConflict::column(Column::Url)
        .update_columns([
            Column::RepoUrl,
            Column::CommittedAt,
            Column::Additions,
            Column::Deletions,
            Column::CommitterName,
            Column::CommitterEmail,
        ])
        .to_owned()
}

/// ON CONFLICT clause for `stargazer_history`.
pub fn stargazer_on_conflict() -> OnConflict {
    use stargazer::Column;

    OnConflict::column(Column::Id)
        .update_columns([Column::RepoUrl, Column::User, Column::StarredAt])
        .to_owned()
}

/// Every field marked `Set`, so the insert carries the full row.
fn into_set<M, A>(model: M) -> A
where
    M: IntoActiveModel<A>,
    A: ActiveModelTrait,
{
    model.into_active_model().reset_all()
}

/// Drop earlier records sharing a key with a later one, keeping first-seen order.
///
/// A single statement may not touch the same row twice on every backend.
fn dedupe_by_key<T, K, F>(models: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut position: HashMap<K, usize> = HashMap::with_capacity(models.len());
    let mut out: Vec<T> = Vec::with_capacity(models.len());

    for model in models {
        match position.get(&key(&model)) {
            Some(&idx) => out[idx] = model,
            None => {
                position.insert(key(&model), out.len());
                out.push(model);
            }
        }
    }

    out
}

/// Insert-or-update `models` in chunks of `batch_size`, one committed
/// transaction per chunk.
///
/// A failure aborts the remaining chunks. Chunks committed earlier stay.
async fn upsert_in_batches<A>(
    db: &DatabaseConnection,
    models: Vec<A>,
    on_conflict: OnConflict,
    batch_size: usize,
) -> Result<u64>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    if models.is_empty() {
        return Ok(0);
    }

    let batch_size = batch_size.max(1);
    let total = models.len();
    let mut written = 0u64;
    let mut remaining = models.into_iter().peekable();

    while remaining.peek().is_some() {
        let batch: Vec<A> = remaining.by_ref().take(batch_size).collect();
        let count = batch.len() as u64;

        let txn = db.begin().await?;
        <A::Entity as EntityTrait>::insert_many(batch)
            .on_conflict(on_conflict.clone())
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;

        written += count;
        tracing::debug!(written, total, "Committed upsert batch");
    }

    Ok(written)
}
