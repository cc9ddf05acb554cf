//! Commit entity - one row per commit on a repository's default branch.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commit_history")]
pub struct Model {
    /// Commit URL.
    #[sea_orm(primary_key, auto_increment = false)]
    pub url: String,
    /// Owning repository.
    pub repo_url: String,
    pub committed_at: DateTimeUtc,
    pub additions: i64,
    pub deletions: i64,
    pub committer_name: String,
    pub committer_email: String,
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
