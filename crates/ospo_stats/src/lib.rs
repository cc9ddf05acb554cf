//! ospo-stats - Repository metadata and history crawler.
//!
//! This library discovers repositories matching a search term, crawls their
//! commit and stargazer history, and stores everything in a relational
//! database for later enrichment and yearly statistics.
//!
//! # Features
//!
//! - `migrate` - Enables database migration support. When enabled, you can use
//!   [`connect_and_migrate`] to automatically run migrations on connection.
//! - `gitlab` - GitLab project CSV import.
//!
//! # Example
//!
//! ```ignore
//! use ospo_stats::{connect_and_migrate, crawl, github::GitHubClient};
//!
//! let db = connect_and_migrate("sqlite://ospo.db?mode=rwc").await?;
//! let client = GitHubClient::new(&token)?;
//!
//! let options = crawl::DiscoveryOptions::new("wisc.edu");
//! let result = crawl::discover(&client, &db, &options, None).await?;
//!
//! let history = crawl::crawl_all_history(&client, &db, &Default::default(), None).await?;
//! ```

pub mod crawl;
pub mod db;
pub mod enrich;
pub mod entity;
pub mod github;
pub mod http;
pub mod parse;
pub mod persist;
pub mod retry;
pub mod stats;

#[cfg(feature = "gitlab")]
pub mod gitlab;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use persist::PersistError;
