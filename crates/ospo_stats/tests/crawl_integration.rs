//! Integration tests for crawling and persistence.
//!
//! These tests require the `sqlite` and `migrate` features to be enabled
//! and use an in-memory SQLite database.

#![cfg(all(feature = "sqlite", feature = "migrate"))]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use ospo_stats::connect_and_migrate;
use ospo_stats::crawl::{
    self, DiscoveryOptions, HistoryOptions, ProgressCallback, import_snapshots, write_snapshot,
};
use ospo_stats::entity::{commit, repository, stargazer};
use ospo_stats::github::{GitHubError, GraphQlExecutor};
use ospo_stats::persist::{count_repositories, has_commit_history, upsert_repositories};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{Value, json};

/// Create an in-memory SQLite database with migrations applied.
async fn setup_test_db() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

fn ts(year: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 3, 1, 12, 0, 0).unwrap()
}

fn create_test_repo(name: &str, stars: i64) -> repository::Model {
    repository::Model {
        url: format!("https://github.com/o/{name}"),
        crawl_at: ts(2024),
        owner: "o".to_string(),
        name: name.to_string(),
        description: Some(format!("Test repo o/{name}")),
        homepage_url: None,
        license_key: Some("mit".to_string()),
        license_name: Some("MIT License".to_string()),
        readme: None,
        readme_has_image: None,
        created_at: ts(2020),
        last_pushed_at: Some(ts(2024)),
        total_stargazer_count: stars,
        total_issues_count: 1,
        total_open_issues_count: 0,
        total_forks_count: 0,
        total_watchers_count: 1,
        is_active: Some(true),
        category: None,
    }
}

fn repo_edge(name: &str, created: &str) -> Value {
    json!({"repo": {
        "owner": {"login": "o"},
        "name": name,
        "url": format!("https://github.com/o/{name}"),
        "description": null,
        "homepageUrl": null,
        "createdAt": created,
        "pushedAt": created,
        "licenseInfo": null,
        "stargazers": {"totalCount": 1},
        "total_issues": {"totalCount": 0},
        "open_issues": {"totalCount": 0},
        "forks": {"totalCount": 0},
        "watchers": {"totalCount": 0},
        "defaultBranchRef": {"target": {"history": {"totalCount": 1}}},
        "readme_standard": null,
        "readme_lower": null
    }})
}

/// Answers history queries for any repository, failing those whose name is
/// listed in `failing`.
struct HistoryServer {
    failing: Vec<&'static str>,
    queries: Mutex<Vec<String>>,
}

impl HistoryServer {
    fn new(failing: Vec<&'static str>) -> Self {
        Self {
            failing,
            queries: Mutex::new(Vec::new()),
        }
    }

    fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

fn quoted_arg<'q>(query: &'q str, key: &str) -> Option<&'q str> {
    let start = query.find(&format!("{key}: \""))? + key.len() + 3;
    let end = query[start..].find('"')? + start;
    Some(&query[start..end])
}

#[async_trait]
impl GraphQlExecutor for HistoryServer {
    async fn execute(
        &self,
        query: &str,
        _on_progress: Option<&ProgressCallback>,
    ) -> Result<Value, GitHubError> {
        self.queries.lock().unwrap().push(query.to_string());
        let name = quoted_arg(query, "name").unwrap_or_default().to_string();

        if self.failing.contains(&name.as_str()) {
            return Err(GitHubError::GraphQl(vec![format!(
                "Could not resolve to a Repository with the name 'o/{name}'."
            )]));
        }

        let page_info = json!({"endCursor": null, "hasNextPage": false});
        if query.contains("stargazers(") {
            return Ok(json!({"repository": {"stargazers": {
                "totalCount": 2,
                "edges": [
                    {"starredAt": "2021-01-01T00:00:00Z", "node": {"login": "ann"}},
                    {"starredAt": "2022-01-01T00:00:00Z", "node": {"login": "bob"}}
                ],
                "pageInfo": page_info
            }}}));
        }

        Ok(json!({"repository": {"defaultBranchRef": {"target": {"history": {
            "totalCount": 1,
            "edges": [{"node": {
                "id": format!("C_{name}"),
                "committedDate": "2020-05-05T05:05:05Z",
                "url": format!("https://github.com/o/{name}/commit/1"),
                "additions": 3,
                "deletions": 1,
                "committer": {"name": "Ada", "email": "ada@example.edu"}
            }}],
            "pageInfo": page_info
        }}}}}))
    }
}

#[tokio::test]
async fn test_upsert_is_idempotent_and_overwrites() {
    let db = setup_test_db().await;

    let repos = vec![create_test_repo("a", 1), create_test_repo("b", 2)];
    upsert_repositories(&db, repos.clone()).await.expect("first upsert");
    upsert_repositories(&db, repos).await.expect("second upsert");
    assert_eq!(count_repositories(&db).await.unwrap(), 2);

    let mut updated = create_test_repo("a", 50);
    updated.category = Some("Software".to_string());
    upsert_repositories(&db, vec![updated]).await.expect("update upsert");

    let stored = repository::Entity::find_by_id("https://github.com/o/a")
        .one(&db)
        .await
        .unwrap()
        .expect("row exists");
    assert_eq!(stored.total_stargazer_count, 50);
    assert_eq!(stored.category.as_deref(), Some("Software"));
    assert_eq!(count_repositories(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_history_failure_is_isolated_per_repository() {
    let db = setup_test_db().await;
    upsert_repositories(
        &db,
        vec![
            create_test_repo("a", 0),
            create_test_repo("b", 0),
            create_test_repo("c", 0),
        ],
    )
    .await
    .unwrap();

    let server = HistoryServer::new(vec!["b"]);
    let result = crawl::crawl_all_history(&server, &db, &HistoryOptions::default(), None)
        .await
        .expect("pass completes despite one failure");

    assert_eq!(result.crawled, 2);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].repo_url, "https://github.com/o/b");

    assert!(has_commit_history(&db, "https://github.com/o/a").await.unwrap());
    assert!(!has_commit_history(&db, "https://github.com/o/b").await.unwrap());
    assert!(has_commit_history(&db, "https://github.com/o/c").await.unwrap());

    let stars = stargazer::Entity::find()
        .filter(stargazer::Column::RepoUrl.eq("https://github.com/o/c"))
        .all(&db)
        .await
        .unwrap();
    let mut ids: Vec<String> = stars.into_iter().map(|s| s.id).collect();
    ids.sort();
    assert_eq!(
        ids,
        vec!["https://github.com/o/c/ann", "https://github.com/o/c/bob"]
    );
}

#[tokio::test]
async fn test_existing_history_is_skipped_without_requests() {
    let db = setup_test_db().await;
    upsert_repositories(&db, vec![create_test_repo("a", 0)]).await.unwrap();

    let server = HistoryServer::new(vec![]);
    let options = HistoryOptions::default();
    crawl::crawl_history(&server, &db, "https://github.com/o/a", &options, None)
        .await
        .expect("first crawl");
    let after_first = server.query_count();
    assert_eq!(after_first, 2);

    let outcome = crawl::crawl_history(&server, &db, "https://github.com/o/a", &options, None)
        .await
        .expect("second crawl");
    assert_eq!(outcome, crawl::HistoryOutcome::Skipped);
    assert_eq!(server.query_count(), after_first);

    // Without skipping, a re-crawl merges into the same rows.
    let options = HistoryOptions {
        skip_existing: false,
    };
    crawl::crawl_history(&server, &db, "https://github.com/o/a", &options, None)
        .await
        .expect("forced crawl");
    assert_eq!(commit::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(stargazer::Entity::find().count(&db).await.unwrap(), 2);
}

/// Serves one search page per year, with results only for 2020.
struct SearchServer;

#[async_trait]
impl GraphQlExecutor for SearchServer {
    async fn execute(
        &self,
        query: &str,
        _on_progress: Option<&ProgressCallback>,
    ) -> Result<Value, GitHubError> {
        let edges = if query.contains("created:2020-") {
            vec![
                repo_edge("x", "2020-02-02T00:00:00Z"),
                repo_edge("y", "2020-08-08T00:00:00Z"),
            ]
        } else {
            Vec::new()
        };
        Ok(json!({"search": {
            "repositoryCount": edges.len(),
            "pageInfo": {"endCursor": null, "hasNextPage": false},
            "repos": edges
        }}))
    }
}

#[tokio::test]
async fn test_discovery_persists_and_snapshots() {
    let db = setup_test_db().await;
    let dir = tempfile::tempdir().unwrap();

    let options = DiscoveryOptions {
        year_min: 2019,
        year_max: 2021,
        output_dir: Some(dir.path().to_path_buf()),
        ..DiscoveryOptions::new("edu")
    };
    let result = crawl::discover(&SearchServer, &db, &options, None)
        .await
        .expect("discovery succeeds");

    assert_eq!(result.years.len(), 1);
    assert_eq!(result.total_saved(), 2);
    assert_eq!(count_repositories(&db).await.unwrap(), 2);
    assert!(dir.path().join("repos_edu_2020.json").exists());
    assert!(!dir.path().join("repos_edu_2019.json").exists());
}

#[tokio::test]
async fn test_snapshot_import_round_trip() {
    let db = setup_test_db().await;
    let dir = tempfile::tempdir().unwrap();

    let edges = vec![
        repo_edge("p", "2018-01-01T00:00:00Z"),
        repo_edge("q", "2018-06-01T00:00:00Z"),
    ];
    write_snapshot(dir.path(), "edu", 2018, &edges).unwrap();
    write_snapshot(dir.path(), "edu", 2019, &edges[..1]).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let summary = import_snapshots(&db, dir.path(), ts(2024), None)
        .await
        .expect("import succeeds");
    assert_eq!(summary.files, 2);
    assert_eq!(summary.found, 3);
    assert_eq!(count_repositories(&db).await.unwrap(), 2);

    let stored = repository::Entity::find_by_id("https://github.com/o/p")
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.crawl_at, ts(2024));
    assert_eq!(stored.is_active, Some(false));
}
