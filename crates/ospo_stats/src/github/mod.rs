//! GitHub GraphQL data source.
//!
//! # Module Structure
//!
//! - [`error`] - Transport and GitHub error types
//! - [`query`] - GraphQL document renderers
//! - [`types`] - Typed response schemas
//! - [`client`] - HTTP client with retry and cool-down
//! - [`pagination`] - Cursor pagination over any [`PagedQuery`]
//! - [`convert`] - Response nodes to database models
//!
//! ```ignore
//! use ospo_stats::github::{DiscoveryQuery, GitHubClient, Paginator};
//!
//! let client = GitHubClient::new(&token)?;
//! let query = DiscoveryQuery { term: "wisc".into(), year: 2020, per_page: 100 };
//! let edges = Paginator::new(&client, query).collect_all().await?;
//! ```

mod client;
mod convert;
mod error;
#[cfg(test)]
pub(crate) mod fixtures;
mod pagination;
mod query;
mod types;

pub use client::{DEFAULT_COOLDOWN, GRAPHQL_ENDPOINT, GitHubClient};
pub use convert::{to_commit, to_repositories, to_repository, to_stargazer};
pub use error::{GitHubError, TransportError, is_transient};
pub use pagination::{
    CommitsQuery, DiscoveryQuery, GraphQlExecutor, Page, PagedQuery, PaginationState, Paginator,
    StargazersQuery,
};
#[cfg(test)]
pub(crate) use pagination::testing::ScriptedExecutor;
pub use query::{
    DEFAULT_DISCOVERY_PAGE_SIZE, HISTORY_PAGE_SIZE, QueryKind, commits_query,
    repo_discovery_query, stargazers_query,
};
pub use types::{
    Blob, BranchTarget, CommitConnection, CommitEdge, CommitNode, CommitsData, Committer,
    DefaultBranchRef, GraphQlErrorItem, GraphQlResponse, LicenseInfo, Owner, PageInfo, RepoEdge,
    RepoNode, SearchConnection, SearchData, StargazerConnection, StargazerEdge, StargazersData,
    TotalCount, UserNode, decode_repo_edges,
};
