//! Common re-exports for convenient entity usage.

pub use super::commit::{
    ActiveModel as CommitActiveModel, Column as CommitColumn, Entity as Commit,
    Model as CommitModel,
};
pub use super::repository::{
    ActiveModel as RepositoryActiveModel, Column as RepositoryColumn, Entity as Repository,
    Model as RepositoryModel,
};
pub use super::stargazer::{
    ActiveModel as StargazerActiveModel, Column as StargazerColumn, Entity as Stargazer,
    Model as StargazerModel, stargazer_id,
};
