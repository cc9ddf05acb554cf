use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::entity::{commit, repository};

use super::errors::Result;

// ─── Query Operations ────────────────────────────────────────────────────────

/// Whether any commit-history row exists for the repository.
///
/// Coarse: a repository whose history crawl stopped halfway still counts.
pub async fn has_commit_history(db: &DatabaseConnection, repo_url: &str) -> Result<bool> {
    let existing = commit::Entity::find()
        .filter(commit::Column::RepoUrl.eq(repo_url))
        .one(db)
        .await?;
    Ok(existing.is_some())
}

/// URLs of every stored repository, ordered by URL.
pub async fn list_repository_urls(db: &DatabaseConnection) -> Result<Vec<String>> {
    let urls = repository::Entity::find()
        .select_only()
        .column(repository::Column::Url)
        .order_by_asc(repository::Column::Url)
        .into_tuple::<String>()
        .all(db)
        .await?;
    Ok(urls)
}

/// Number of stored repositories.
pub async fn count_repositories(db: &DatabaseConnection) -> Result<u64> {
    Ok(repository::Entity::find().count(db).await?)
}

/// One page of repositories ordered by URL.
pub async fn find_repositories_page(
    db: &DatabaseConnection,
    offset: u64,
    limit: u64,
) -> Result<Vec<repository::Model>> {
    let items = repository::Entity::find()
        .order_by_asc(repository::Column::Url)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use super::*;

    fn commit_model() -> commit::Model {
        commit::Model {
            url: "https://github.com/o/r/commit/abc".to_string(),
            repo_url: "https://github.com/o/r".to_string(),
            committed_at: Utc.with_ymd_and_hms(2022, 2, 2, 2, 2, 2).unwrap(),
            additions: 10,
            deletions: 2,
            committer_name: "Ada".to_string(),
            committer_email: "ada@example.edu".to_string(),
        }
    }

    #[tokio::test]
    async fn has_commit_history_is_true_when_a_row_exists() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![commit_model()]])
            .into_connection();

        assert!(
            has_commit_history(&db, "https://github.com/o/r")
                .await
                .expect("query should succeed")
        );
    }

    #[tokio::test]
    async fn has_commit_history_is_false_without_rows() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<commit::Model>::new()])
            .into_connection();

        assert!(
            !has_commit_history(&db, "https://github.com/o/r")
                .await
                .expect("query should succeed")
        );
    }

    #[tokio::test]
    async fn count_repositories_reads_count_row() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![BTreeMap::from([(
                "num_items".to_string(),
                Value::Int(Some(7)),
            )])]])
            .into_connection();

        let count = count_repositories(&db).await.expect("count should succeed");
        assert_eq!(count, 7);
    }
}
