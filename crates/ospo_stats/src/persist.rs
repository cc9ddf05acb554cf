//! Persistence gateway for repositories, commits and stargazer events.
//!
//! Every function takes the connection explicitly. Writes merge by primary
//! key and are committed in fixed-size batches, one transaction per batch.

mod errors;
mod query;
mod upsert;

pub use errors::{PersistError, Result};
pub use query::{
    count_repositories, find_repositories_page, has_commit_history, list_repository_urls,
};
pub use upsert::{
    UPSERT_BATCH_SIZE, commit_on_conflict, repository_on_conflict, stargazer_on_conflict,
    upsert_commits, upsert_repositories, upsert_stargazers,
};
