//! Crawl options, results and constants.

use std::path::PathBuf;

use chrono::{Datelike, Utc};

use crate::github::DEFAULT_DISCOVERY_PAGE_SIZE;

/// First creation year searched by default. GitHub opened in 2008.
pub const DEFAULT_YEAR_MIN: i32 = 2008;

/// Options for a discovery crawl of one search term.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Search term, matched anywhere GitHub's repository search looks.
    pub term: String,
    /// First creation year (inclusive).
    pub year_min: i32,
    /// Last creation year (inclusive).
    pub year_max: i32,
    /// Results per search page.
    pub per_page: u32,
    /// Where raw per-year snapshots are written. `None` disables snapshots.
    pub output_dir: Option<PathBuf>,
    /// Whether parsed repositories are upserted.
    pub persist: bool,
}

impl DiscoveryOptions {
    /// Defaults: every year from 2008 through the current one, persisted, no snapshots.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            year_min: DEFAULT_YEAR_MIN,
            year_max: Utc::now().year(),
            per_page: DEFAULT_DISCOVERY_PAGE_SIZE,
            output_dir: None,
            persist: true,
        }
    }
}

/// Per-year outcome of a discovery crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSummary {
    pub year: i32,
    /// Raw search results, empty repositories included.
    pub found: usize,
    /// Repositories written to the database.
    pub saved: usize,
    /// Snapshot written for this year, if any.
    pub snapshot: Option<PathBuf>,
}

/// Result of a discovery crawl.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    pub term: String,
    /// Only years with at least one result.
    pub years: Vec<YearSummary>,
}

impl DiscoveryResult {
    pub fn total_found(&self) -> usize {
        self.years.iter().map(|y| y.found).sum()
    }

    pub fn total_saved(&self) -> usize {
        self.years.iter().map(|y| y.saved).sum()
    }
}

/// Options for history crawls.
#[derive(Debug, Clone)]
pub struct HistoryOptions {
    /// Skip repositories that already have commit history rows.
    pub skip_existing: bool,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            skip_existing: true,
        }
    }
}

/// What happened to one repository during a history crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutcome {
    Skipped,
    Crawled { commits: usize, stargazers: usize },
}

/// A repository whose history crawl failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFailure {
    pub repo_url: String,
    pub error: String,
}

/// Result of a history pass over many repositories.
#[derive(Debug, Clone, Default)]
pub struct HistoryResult {
    pub crawled: usize,
    pub skipped: usize,
    pub commits: usize,
    pub stargazers: usize,
    /// Failures (non-fatal), in crawl order.
    pub errors: Vec<HistoryFailure>,
}

impl HistoryResult {
    pub(crate) fn record(&mut self, outcome: HistoryOutcome) {
        match outcome {
            HistoryOutcome::Skipped => self.skipped += 1,
            HistoryOutcome::Crawled {
                commits,
                stargazers,
            } => {
                self.crawled += 1;
                self.commits += commits;
                self.stargazers += stargazers;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_defaults_cover_2008_through_this_year() {
        let options = DiscoveryOptions::new("wisc");
        assert_eq!(options.term, "wisc");
        assert_eq!(options.year_min, 2008);
        assert_eq!(options.year_max, Utc::now().year());
        assert_eq!(options.per_page, 100);
        assert!(options.persist);
        assert!(options.output_dir.is_none());
    }

    #[test]
    fn history_result_accumulates_outcomes() {
        let mut result = HistoryResult::default();
        result.record(HistoryOutcome::Skipped);
        result.record(HistoryOutcome::Crawled {
            commits: 10,
            stargazers: 3,
        });
        result.record(HistoryOutcome::Crawled {
            commits: 1,
            stargazers: 0,
        });

        assert_eq!(result.skipped, 1);
        assert_eq!(result.crawled, 2);
        assert_eq!(result.commits, 11);
        assert_eq!(result.stargazers, 3);
    }

    #[test]
    fn discovery_result_totals() {
        let result = DiscoveryResult {
            term: "wisc".to_string(),
            years: vec![
                YearSummary {
                    year: 2019,
                    found: 5,
                    saved: 4,
                    snapshot: None,
                },
                YearSummary {
                    year: 2020,
                    found: 2,
                    saved: 2,
                    snapshot: None,
                },
            ],
        };
        assert_eq!(result.total_found(), 7);
        assert_eq!(result.total_saved(), 6);
    }
}
