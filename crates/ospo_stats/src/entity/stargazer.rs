//! Stargazer entity - one row per (repository, user) star event.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stargazer_history")]
pub struct Model {
    /// `"{repo_url}/{user}"`, see [`stargazer_id`].
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub repo_url: String,
    pub user: String,
    pub starred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repository::Entity",
        from = "Column::RepoUrl",
        to = "super::repository::Column::Url"
    )]
    Repository,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Composite key of a star event.
pub fn stargazer_id(repo_url: &str, user: &str) -> String {
    format!("{repo_url}/{user}")
}
