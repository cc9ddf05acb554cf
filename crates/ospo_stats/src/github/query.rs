//! GraphQL documents for discovery and history crawls.
//!
//! Every renderer is pure. A cursor is rendered as `after: "<cursor>"` and the
//! directive is omitted entirely on the first page.

use std::fmt::Write as _;

/// Page size of the stargazer and commit history queries.
pub const HISTORY_PAGE_SIZE: u32 = 100;

/// Default page size of the discovery search.
pub const DEFAULT_DISCOVERY_PAGE_SIZE: u32 = 100;

/// The three query shapes the crawler issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    RepoDiscovery,
    Stargazers,
    Commits,
}

impl QueryKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::RepoDiscovery => "repo_discovery",
            QueryKind::Stargazers => "stargazers",
            QueryKind::Commits => "commits",
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render `value` as a GraphQL string literal.
pub(crate) fn graphql_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn after_line(cursor: Option<&str>) -> String {
    cursor
        .map(|c| format!("after: {}", graphql_string(c)))
        .unwrap_or_default()
}

/// Search for repositories matching `term` created during `year`.
#[must_use]
pub fn repo_discovery_query(term: &str, year: i32, per_page: u32, cursor: Option<&str>) -> String {
    let search = graphql_string(&format!("{term} created:{year}-01-01..{year}-12-31"));
    let after = after_line(cursor);

    format!(
        r#"{{
  search(
    type: REPOSITORY
    query: {search}
    first: {per_page}
    {after}
  ) {{
    repositoryCount
    pageInfo {{
      endCursor
      hasNextPage
    }}
    repos: edges {{
      repo: node {{
        ... on Repository {{
          owner {{
            login
          }}
          name
          url
          description
          homepageUrl
          createdAt
          pushedAt
          licenseInfo {{
            key
            name
          }}
          stargazers {{
            totalCount
          }}
          total_issues: issues {{
            totalCount
          }}
          open_issues: issues(states: OPEN) {{
            totalCount
          }}
          forks {{
            totalCount
          }}
          watchers {{
            totalCount
          }}
          defaultBranchRef {{
            target {{
              ... on Commit {{
                history(first: 0) {{
                  totalCount
                }}
              }}
            }}
          }}
          readme_standard: object(expression: "HEAD:README.md") {{
            ... on Blob {{
              text
            }}
          }}
          readme_lower: object(expression: "HEAD:readme.md") {{
            ... on Blob {{
              text
            }}
          }}
        }}
      }}
    }}
  }}
}}"#
    )
}

/// Stargazers of one repository, with the time each star was given.
#[must_use]
pub fn stargazers_query(owner: &str, name: &str, cursor: Option<&str>) -> String {
    let owner = graphql_string(owner);
    let name = graphql_string(name);
    let after = after_line(cursor);

    format!(
        r#"{{
  repository(owner: {owner}, name: {name}) {{
    stargazers(
      first: {HISTORY_PAGE_SIZE}
      {after}
    ) {{
      totalCount
      edges {{
        starredAt
        node {{
          login
        }}
      }}
      pageInfo {{
        endCursor
        hasNextPage
      }}
    }}
  }}
}}"#
    )
}

/// Commit history of one repository's default branch.
#[must_use]
pub fn commits_query(owner: &str, name: &str, cursor: Option<&str>) -> String {
    let owner = graphql_string(owner);
    let name = graphql_string(name);
    let after = after_line(cursor);

    format!(
        r#"{{
  repository(owner: {owner}, name: {name}) {{
    defaultBranchRef {{
      target {{
        ... on Commit {{
          history(
            first: {HISTORY_PAGE_SIZE}
            {after}
          ) {{
            totalCount
            edges {{
              node {{
                id
                committedDate
                url
                additions
                deletions
                committer {{
                  name
                  email
                }}
              }}
            }}
            pageInfo {{
              endCursor
              hasNextPage
            }}
          }}
        }}
      }}
    }}
  }}
}}"#
    )
}
