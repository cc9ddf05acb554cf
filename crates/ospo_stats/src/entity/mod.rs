//! SeaORM entity definitions for the crawl database schema.

pub mod commit;
pub mod prelude;
pub mod repository;
pub mod stargazer;
