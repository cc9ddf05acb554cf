//! Repository entity - one row per crawled repository, keyed by its URL.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Repository model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repo")]
pub struct Model {
    /// Canonical repository URL.
    #[sea_orm(primary_key, auto_increment = false)]
    pub url: String,

    // ─── Crawl ───────────────────────────────────────────────────────────────
    /// When this record was fetched.
    pub crawl_at: DateTimeUtc,

    // ─── Naming ──────────────────────────────────────────────────────────────
    /// Owner login (user, organization or namespace).
    pub owner: String,
    /// Repository name.
    pub name: String,

    // ─── Content ─────────────────────────────────────────────────────────────
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub homepage_url: Option<String>,
    /// License key and name are either both set or both absent.
    pub license_key: Option<String>,
    pub license_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub readme: Option<String>,
    pub readme_has_image: Option<bool>,

    // ─── Timestamps ──────────────────────────────────────────────────────────
    pub created_at: DateTimeUtc,
    pub last_pushed_at: Option<DateTimeUtc>,

    // ─── Statistics ──────────────────────────────────────────────────────────
    pub total_stargazer_count: i64,
    pub total_issues_count: i64,
    pub total_open_issues_count: i64,
    pub total_forks_count: i64,
    pub total_watchers_count: i64,

    // ─── Enrichment ──────────────────────────────────────────────────────────
    /// Pushed within a year of the crawl. Unknown without a push time.
    pub is_active: Option<bool>,
    /// Label assigned by the classifier.
    pub category: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::commit::Entity")]
    Commit,
    #[sea_orm(has_many = "super::stargazer::Entity")]
    Stargazer,
}

impl Related<super::commit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commit.def()
    }
}

impl Related<super::stargazer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stargazer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Compute the full name (owner/name).
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Text handed to the classifier: name, description and README.
    pub fn classifier_text(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        if let Some(description) = self.description.as_deref() {
            parts.push(description);
        }
        if let Some(readme) = self.readme.as_deref() {
            parts.push(readme);
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_test_model(owner: &str, name: &str) -> Model {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Model {
            url: format!("https://github.com/{owner}/{name}"),
            crawl_at: ts,
            owner: owner.to_string(),
            name: name.to_string(),
            description: Some("A test repository".to_string()),
            homepage_url: None,
            license_key: None,
            license_name: None,
            readme: None,
            readme_has_image: None,
            created_at: ts,
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

    #[test]
    fn test_full_name() {
        let model = make_test_model("octocat", "hello-world");
        assert_eq!(model.full_name(), "octocat/hello-world");
    }

    #[test]
    fn classifier_text_skips_missing_parts() {
        let mut model = make_test_model("o", "lab-tools");
        assert_eq!(model.classifier_text(), "lab-tools A test repository");

        model.description = None;
        model.readme = Some("# Lab tools".to_string());
        assert_eq!(model.classifier_text(), "lab-tools # Lab tools");
    }
}
