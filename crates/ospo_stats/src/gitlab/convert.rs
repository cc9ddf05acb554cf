//! Conversion from GitLab project export rows to repository models.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::entity::repository;
use crate::parse::{ParseError, activity_flag, non_empty, parse_timestamp_with};

/// Timestamp format of the project export.
pub const GITLAB_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of a GitLab project export. Unknown columns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GitLabProjectRow {
    pub http_url_to_repo: String,
    pub created_at: String,
    #[serde(default)]
    pub last_activity_at: Option<String>,
    pub name_with_namespace: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub readme_has_images: Option<String>,
    #[serde(default)]
    pub star_count: Option<i64>,
    #[serde(default)]
    pub open_issues_count: Option<i64>,
    #[serde(default)]
    pub forks_count: Option<i64>,
}

/// Owner is the top-level namespace: the part before the first `" / "`.
fn owner_of(name_with_namespace: &str) -> String {
    name_with_namespace
        .split(" / ")
        .next()
        .unwrap_or(name_with_namespace)
        .trim()
        .to_string()
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Some(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Some(false),
        _ => None,
    }
}

/// Convert one export row. GitLab exports carry no license or README text.
pub fn to_repository(
    row: GitLabProjectRow,
    crawl_at: DateTime<Utc>,
) -> Result<repository::Model, ParseError> {
    let created_at = parse_timestamp_with("created_at", &row.created_at, GITLAB_TIMESTAMP_FORMAT)?;
    let last_pushed_at = non_empty(row.last_activity_at)
        .map(|v| parse_timestamp_with("last_activity_at", &v, GITLAB_TIMESTAMP_FORMAT))
        .transpose()?;

    Ok(repository::Model {
        url: row.http_url_to_repo,
        crawl_at,
        owner: owner_of(&row.name_with_namespace),
        name: row.name,
        description: non_empty(row.description),
        homepage_url: non_empty(row.web_url),
        license_key: None,
        license_name: None,
        readme: None,
        readme_has_image: parse_flag(row.readme_has_images.as_deref()),
        created_at,
        last_pushed_at,
        total_stargazer_count: row.star_count.unwrap_or(0).max(0),
        total_issues_count: 0,
        total_open_issues_count: row.open_issues_count.unwrap_or(0).max(0),
        total_forks_count: row.forks_count.unwrap_or(0).max(0),
        total_watchers_count: 0,
        is_active: activity_flag(crawl_at, last_pushed_at),
        category: None,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn row() -> GitLabProjectRow {
        GitLabProjectRow {
            http_url_to_repo: "https://git.doit.wisc.edu/lab/tools/pipeline.git".to_string(),
            created_at: "2018-09-10 14:22:01".to_string(),
            last_activity_at: Some("2024-03-01 09:00:00".to_string()),
            name_with_namespace: "Lab / Tools / pipeline".to_string(),
            name: "pipeline".to_string(),
            description: Some(String::new()),
            web_url: Some("https://git.doit.wisc.edu/lab/tools/pipeline".to_string()),
            readme_has_images: Some("True".to_string()),
            star_count: Some(4),
            open_issues_count: None,
            forks_count: Some(1),
        }
    }

    #[test]
    fn converts_export_row() {
        let crawl_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let model = to_repository(row(), crawl_at).expect("row should convert");

        assert_eq!(model.url, "https://git.doit.wisc.edu/lab/tools/pipeline.git");
        assert_eq!(model.owner, "Lab");
        assert_eq!(model.name, "pipeline");
        assert_eq!(model.description, None);
        assert_eq!(
            model.created_at,
            Utc.with_ymd_and_hms(2018, 9, 10, 14, 22, 1).unwrap()
        );
        assert_eq!(model.readme_has_image, Some(true));
        assert_eq!(model.total_stargazer_count, 4);
        assert_eq!(model.total_open_issues_count, 0);
        assert_eq!(model.total_forks_count, 1);
        assert_eq!(model.total_issues_count, 0);
        assert_eq!(model.total_watchers_count, 0);
        assert_eq!(model.license_key, None);
        assert_eq!(model.is_active, Some(true));
    }

    #[test]
    fn rejects_graphql_style_timestamps() {
        let mut bad = row();
        bad.created_at = "2018-09-10T14:22:01Z".to_string();
        let err = to_repository(bad, Utc::now()).expect_err("wrong format");
        assert!(matches!(err, ParseError::Timestamp { field: "created_at", .. }));
    }

    #[test]
    fn flag_parsing_is_lenient() {
        assert_eq!(parse_flag(Some("False")), Some(false));
        assert_eq!(parse_flag(Some("1")), Some(true));
        assert_eq!(parse_flag(Some("")), None);
        assert_eq!(parse_flag(None), None);
    }

    #[test]
    fn owner_without_namespace_separator() {
        assert_eq!(owner_of("solo"), "solo");
    }
}
