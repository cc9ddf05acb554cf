//! Integration tests for GitLab import and yearly statistics.

#![cfg(all(feature = "sqlite", feature = "migrate", feature = "gitlab"))]

use chrono::{TimeZone, Utc};
use ospo_stats::connect_and_migrate;
use ospo_stats::entity::{commit, repository};
use ospo_stats::gitlab::import_gitlab_csv;
use ospo_stats::persist::{upsert_commits, upsert_repositories};
use ospo_stats::stats::{YearlyCount, commits_by_year, repos_by_year, stargazers_by_year};
use sea_orm::{DatabaseConnection, EntityTrait};

async fn setup_test_db() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

const EXPORT: &str = "\
http_url_to_repo,created_at,last_activity_at,name_with_namespace,name,description,web_url,readme_has_images,star_count,open_issues_count,forks_count
https://git.example.edu/lab/tools.git,2019-04-01 10:00:00,2024-01-01 00:00:00,lab / tools,tools,Lab tools,https://git.example.edu/lab/tools,True,4,1,2
https://git.example.edu/lab/sub/notes.git,2021-09-09 09:09:09,,lab / sub / notes,notes,,,False,,,
";

#[tokio::test]
async fn test_gitlab_csv_import() {
    let db = setup_test_db().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.csv");
    std::fs::write(&path, EXPORT).unwrap();

    let saved = import_gitlab_csv(&db, &path).await.expect("import succeeds");
    assert_eq!(saved, 2);

    let tools = repository::Entity::find_by_id("https://git.example.edu/lab/tools.git")
        .one(&db)
        .await
        .unwrap()
        .expect("tools imported");
    assert_eq!(tools.owner, "lab");
    assert_eq!(tools.total_stargazer_count, 4);
    assert_eq!(tools.total_forks_count, 2);
    assert_eq!(tools.readme_has_image, Some(true));
    assert_eq!(
        tools.created_at,
        Utc.with_ymd_and_hms(2019, 4, 1, 10, 0, 0).unwrap()
    );

    let notes = repository::Entity::find_by_id("https://git.example.edu/lab/sub/notes.git")
        .one(&db)
        .await
        .unwrap()
        .expect("notes imported");
    assert_eq!(notes.owner, "lab");
    assert_eq!(notes.total_stargazer_count, 0);
    assert_eq!(notes.last_pushed_at, None);
    assert_eq!(notes.is_active, None);

    // Importing the same export again merges by URL.
    import_gitlab_csv(&db, &path).await.unwrap();
    assert_eq!(repository::Entity::find().all(&db).await.unwrap().len(), 2);
}

fn repo(name: &str, year: i32) -> repository::Model {
    let created = Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).unwrap();
    repository::Model {
        url: format!("https://github.com/o/{name}"),
        crawl_at: created,
        owner: "o".to_string(),
        name: name.to_string(),
        description: None,
        homepage_url: None,
        license_key: None,
        license_name: None,
        readme: None,
        readme_has_image: None,
        created_at: created,
        last_pushed_at: None,
        total_stargazer_count: 0,
        total_issues_count: 0,
        total_open_issues_count: 0,
        total_forks_count: 0,
        total_watchers_count: 0,
        is_active: None,
        category: None,
    }
}

#[tokio::test]
async fn test_yearly_counts_are_ordered_and_cumulative() {
    let db = setup_test_db().await;
    upsert_repositories(
        &db,
        vec![repo("a", 2021), repo("b", 2019), repo("c", 2021), repo("d", 2022)],
    )
    .await
    .unwrap();

    let series = repos_by_year(&db).await.expect("stats query");
    assert_eq!(
        series,
        vec![
            YearlyCount {
                year: 2019,
                count: 1,
                cumulative: 1
            },
            YearlyCount {
                year: 2021,
                count: 2,
                cumulative: 3
            },
            YearlyCount {
                year: 2022,
                count: 1,
                cumulative: 4
            },
        ]
    );

    upsert_commits(
        &db,
        vec![commit::Model {
            url: "https://github.com/o/a/commit/1".to_string(),
            repo_url: "https://github.com/o/a".to_string(),
            committed_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            additions: 1,
            deletions: 0,
            committer_name: "Ada".to_string(),
            committer_email: "ada@example.edu".to_string(),
        }],
    )
    .await
    .unwrap();

    let commits = commits_by_year(&db).await.unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].year, 2023);
    assert!(stargazers_by_year(&db).await.unwrap().is_empty());
}
