//! Conversion from GraphQL response nodes to database models.

use chrono::{DateTime, Utc};

use crate::entity::{commit, repository, stargazer};
use crate::parse::{
    ParseError, activity_flag, non_empty, parse_timestamp, readme_has_image,
};

use super::types::{CommitEdge, RepoEdge, StargazerEdge, TotalCount};

fn count(total: TotalCount) -> i64 {
    i64::try_from(total.total_count).unwrap_or(i64::MAX)
}

/// Convert one discovery edge into a repository row.
///
/// Returns `Ok(None)` for an empty repository (no default branch); those are
/// never persisted.
pub fn to_repository(
    edge: RepoEdge,
    crawl_at: DateTime<Utc>,
) -> Result<Option<repository::Model>, ParseError> {
    let repo = edge.repo;
    if repo.default_branch_ref.is_none() {
        tracing::debug!(repo_url = %repo.url, "Skipping empty repository");
        return Ok(None);
    }

    // The first blob present wins, even when its text is null (binary).
    let readme = match (repo.readme_standard, repo.readme_lower) {
        (Some(blob), _) => blob.text,
        (None, Some(blob)) => {
            tracing::debug!(repo_url = %repo.url, "Using lowercase readme.md");
            blob.text
        }
        (None, None) => {
            tracing::debug!(repo_url = %repo.url, "No README file");
            None
        }
    };

    let (license_key, license_name) = match repo.license_info {
        Some(license) => (Some(license.key), Some(license.name)),
        None => (None, None),
    };

    let created_at = parse_timestamp("createdAt", &repo.created_at)?;
    let last_pushed_at = repo
        .pushed_at
        .as_deref()
        .map(|value| parse_timestamp("pushedAt", value))
        .transpose()?;

    Ok(Some(repository::Model {
        url: repo.url,
        crawl_at,
        owner: repo.owner.login,
        name: repo.name,
        description: repo.description,
        homepage_url: non_empty(repo.homepage_url),
        license_key,
        license_name,
        readme_has_image: readme.as_deref().map(readme_has_image),
        readme,
        created_at,
        last_pushed_at,
        total_stargazer_count: count(repo.stargazers),
        total_issues_count: count(repo.total_issues),
        total_open_issues_count: count(repo.open_issues),
        total_forks_count: count(repo.forks),
        total_watchers_count: count(repo.watchers),
        is_active: activity_flag(crawl_at, last_pushed_at),
        category: None,
    }))
}

/// Convert a batch of discovery edges, dropping empty repositories.
pub fn to_repositories(
    edges: Vec<RepoEdge>,
    crawl_at: DateTime<Utc>,
) -> Result<Vec<repository::Model>, ParseError> {
    let mut models = Vec::with_capacity(edges.len());
    for edge in edges {
        if let Some(model) = to_repository(edge, crawl_at)? {
            models.push(model);
        }
    }
    Ok(models)
}

/// Convert one commit edge, tagging it with the owning repository.
pub fn to_commit(edge: CommitEdge, repo_url: &str) -> Result<commit::Model, ParseError> {
    let node = edge.node;
    let committer = node.committer.ok_or(ParseError::MissingField("committer"))?;

    Ok(commit::Model {
        committed_at: parse_timestamp("committedDate", &node.committed_date)?,
        url: node.url,
        repo_url: repo_url.to_string(),
        additions: i64::try_from(node.additions).unwrap_or(i64::MAX),
        deletions: i64::try_from(node.deletions).unwrap_or(i64::MAX),
        committer_name: committer
            .name
            .ok_or(ParseError::MissingField("committer.name"))?,
        committer_email: committer
            .email
            .ok_or(ParseError::MissingField("committer.email"))?,
    })
}

/// Convert one stargazer edge, tagging it with the owning repository.
pub fn to_stargazer(edge: StargazerEdge, repo_url: &str) -> Result<stargazer::Model, ParseError> {
    let user = edge.node.login;
    Ok(stargazer::Model {
        id: stargazer::stargazer_id(repo_url, &user),
        repo_url: repo_url.to_string(),
        starred_at: parse_timestamp("starredAt", &edge.starred_at)?,
        user,
    })
}
