//! Cursor pagination over GraphQL connections.
//!
//! A [`Paginator`] drives one [`PagedQuery`] against a [`GraphQlExecutor`]
//! until the source reports no further page. Pages are appended in source
//! order; the cursor lives only inside the paginator.

use async_trait::async_trait;

use crate::crawl::{CrawlProgress, ProgressCallback, emit};
use crate::parse::ParseError;

use super::error::GitHubError;
use super::query::{QueryKind, commits_query, repo_discovery_query, stargazers_query};
use super::types::{
    CommitEdge, CommitsData, PageInfo, SearchData, StargazerEdge, StargazersData,
};

/// Executes one GraphQL document and returns its `data` payload.
#[async_trait]
pub trait GraphQlExecutor: Send + Sync {
    async fn execute(
        &self,
        query: &str,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<serde_json::Value, GitHubError>;
}

/// One decoded page of a connection.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
    /// Total size of the connection as reported by the source.
    pub reported_total: u64,
}

impl<T> Page<T> {
    /// A terminal page with no items, used when the parent object is absent.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page_info: PageInfo::default(),
            reported_total: 0,
        }
    }
}

/// A query that can be rendered for a cursor and decoded into a page.
pub trait PagedQuery: Send + Sync {
    type Item: Send;

    fn kind(&self) -> QueryKind;

    /// Short human-readable label for logs and progress.
    fn label(&self) -> String;

    fn render(&self, cursor: Option<&str>) -> String;

    fn decode(&self, data: serde_json::Value) -> Result<Page<Self::Item>, ParseError>;
}

/// Repository search for one term and creation year.
///
/// Items are the raw edges of each page; decode them with
/// [`decode_repo_edges`](super::types::decode_repo_edges).
#[derive(Debug, Clone)]
pub struct DiscoveryQuery {
    pub term: String,
    pub year: i32,
    pub per_page: u32,
}

impl PagedQuery for DiscoveryQuery {
    type Item = serde_json::Value;

    fn kind(&self) -> QueryKind {
        QueryKind::RepoDiscovery
    }

    fn label(&self) -> String {
        format!("repos {:?} {}", self.term, self.year)
    }

    fn render(&self, cursor: Option<&str>) -> String {
        repo_discovery_query(&self.term, self.year, self.per_page, cursor)
    }

    fn decode(&self, data: serde_json::Value) -> Result<Page<serde_json::Value>, ParseError> {
        let data: SearchData<serde_json::Value> = serde_json::from_value(data)?;
        Ok(Page {
            items: data.search.repos,
            page_info: data.search.page_info,
            reported_total: data.search.repository_count,
        })
    }
}

/// Stargazers of one repository.
#[derive(Debug, Clone)]
pub struct StargazersQuery {
    pub owner: String,
    pub name: String,
}

impl PagedQuery for StargazersQuery {
    type Item = StargazerEdge;

    fn kind(&self) -> QueryKind {
        QueryKind::Stargazers
    }

    fn label(&self) -> String {
        format!("stargazers {}/{}", self.owner, self.name)
    }

    fn render(&self, cursor: Option<&str>) -> String {
        stargazers_query(&self.owner, &self.name, cursor)
    }

    fn decode(&self, data: serde_json::Value) -> Result<Page<StargazerEdge>, ParseError> {
        let data: StargazersData = serde_json::from_value(data)?;
        Ok(match data.repository {
            Some(repo) => Page {
                items: repo.stargazers.edges,
                page_info: repo.stargazers.page_info,
                reported_total: repo.stargazers.total_count,
            },
            None => Page::empty(),
        })
    }
}

/// Default-branch commit history of one repository.
#[derive(Debug, Clone)]
pub struct CommitsQuery {
    pub owner: String,
    pub name: String,
}

impl PagedQuery for CommitsQuery {
    type Item = CommitEdge;

    fn kind(&self) -> QueryKind {
        QueryKind::Commits
    }

    fn label(&self) -> String {
        format!("commits {}/{}", self.owner, self.name)
    }

    fn render(&self, cursor: Option<&str>) -> String {
        commits_query(&self.owner, &self.name, cursor)
    }

    fn decode(&self, data: serde_json::Value) -> Result<Page<CommitEdge>, ParseError> {
        let data: CommitsData = serde_json::from_value(data)?;
        let history = data
            .repository
            .and_then(|r| r.default_branch_ref)
            .and_then(|b| b.target.history);

        Ok(match history {
            Some(history) => Page {
                items: history.edges,
                page_info: history.page_info,
                reported_total: history.total_count,
            },
            None => Page::empty(),
        })
    }
}

/// Where a paginated fetch stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationState {
    /// Nothing fetched yet; the first request carries no cursor.
    Init,
    /// More pages remain after `cursor`.
    Fetching { cursor: String },
    /// The last page has been fetched.
    Done,
}

impl PaginationState {
    /// State following a page with the given `pageInfo`.
    pub fn after(page_info: &PageInfo) -> Result<Self, ParseError> {
        if !page_info.has_next_page {
            return Ok(PaginationState::Done);
        }
        match &page_info.end_cursor {
            Some(cursor) => Ok(PaginationState::Fetching {
                cursor: cursor.clone(),
            }),
            None => Err(ParseError::MissingCursor),
        }
    }
}

/// Drives a [`PagedQuery`] page by page.
pub struct Paginator<'a, Q: PagedQuery> {
    executor: &'a dyn GraphQlExecutor,
    query: Q,
    state: PaginationState,
    pages: u32,
    fetched: usize,
    reported_total: Option<u64>,
    on_progress: Option<&'a ProgressCallback>,
}

impl<'a, Q: PagedQuery> Paginator<'a, Q> {
    pub fn new(executor: &'a dyn GraphQlExecutor, query: Q) -> Self {
        Self {
            executor,
            query,
            state: PaginationState::Init,
            pages: 0,
            fetched: 0,
            reported_total: None,
            on_progress: None,
        }
    }

    /// Report page progress through `on_progress`.
    #[must_use]
    pub fn with_progress(mut self, on_progress: Option<&'a ProgressCallback>) -> Self {
        self.on_progress = on_progress;
        self
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Total reported by the most recent page.
    pub fn reported_total(&self) -> Option<u64> {
        self.reported_total
    }

    /// Fetch the next page. Returns `None` once the connection is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Q::Item>>, GitHubError> {
        let cursor = match &self.state {
            PaginationState::Done => return Ok(None),
            PaginationState::Init => None,
            PaginationState::Fetching { cursor } => Some(cursor.clone()),
        };

        let document = self.query.render(cursor.as_deref());
        let data = self.executor.execute(&document, self.on_progress).await?;
        let page = self.query.decode(data)?;

        self.state = PaginationState::after(&page.page_info)?;
        self.pages += 1;
        self.fetched += page.items.len();
        self.reported_total = Some(page.reported_total);

        tracing::debug!(
            query = %self.query.kind(),
            resource = %self.query.label(),
            page = self.pages,
            count = page.items.len(),
            total_so_far = self.fetched,
            reported_total = page.reported_total,
            "Fetched page"
        );
        emit(
            self.on_progress,
            CrawlProgress::FetchedPage {
                resource: self.query.label(),
                page: self.pages,
                count: page.items.len(),
                total_so_far: self.fetched,
                reported_total: page.reported_total,
            },
        );

        Ok(Some(page.items))
    }

    /// Fetch every remaining page and return all items in source order.
    pub async fn collect_all(mut self) -> Result<Vec<Q::Item>, GitHubError> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page);
        }

        if let Some(reported) = self.reported_total
            && reported != items.len() as u64
        {
            tracing::debug!(
                resource = %self.query.label(),
                fetched = items.len(),
                reported,
                "Fetched count differs from reported total"
            );
        }

        Ok(items)
    }
}
