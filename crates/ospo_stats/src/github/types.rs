//! Response schemas for the GraphQL queries.
//!
//! Field names follow the aliases used in the rendered documents. Discovery
//! pages are first read with raw `serde_json::Value` edges so the unmodified
//! payload can be snapshotted; [`decode_repo_edges`] applies the schema.

use serde::Deserialize;

use crate::parse::ParseError;

/// GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlErrorItem {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u64,
}

// ─── Discovery ───────────────────────────────────────────────────────────────

/// Search payload, generic over the edge type so pages can be read raw.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchData<E = RepoEdge> {
    pub search: SearchConnection<E>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConnection<E = RepoEdge> {
    pub repository_count: u64,
    pub page_info: PageInfo,
    #[serde(default = "Vec::new")]
    pub repos: Vec<E>,
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoEdge {
    pub repo: RepoNode,
}

/// Decode raw search edges. Any edge that does not match [`RepoEdge`] fails
/// the whole batch.
pub fn decode_repo_edges(raw: Vec<serde_json::Value>) -> Result<Vec<RepoEdge>, ParseError> {
    raw.into_iter()
        .map(|edge| serde_json::from_value(edge).map_err(ParseError::from))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoNode {
    pub owner: Owner,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub homepage_url: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub pushed_at: Option<String>,
    #[serde(default)]
    pub license_info: Option<LicenseInfo>,
    pub stargazers: TotalCount,
    #[serde(rename = "total_issues")]
    pub total_issues: TotalCount,
    #[serde(rename = "open_issues")]
    pub open_issues: TotalCount,
    pub forks: TotalCount,
    pub watchers: TotalCount,
    pub default_branch_ref: Option<DefaultBranchRef>,
    #[serde(rename = "readme_standard", default)]
    pub readme_standard: Option<Blob>,
    #[serde(rename = "readme_lower", default)]
    pub readme_lower: Option<Blob>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LicenseInfo {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefaultBranchRef {
    pub target: BranchTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BranchTarget {
    #[serde(default)]
    pub history: Option<TotalCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Blob {
    #[serde(default)]
    pub text: Option<String>,
}

// ─── Stargazers ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct StargazersData {
    pub repository: Option<StargazersRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StargazersRepository {
    pub stargazers: StargazerConnection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StargazerConnection {
    pub total_count: u64,
    #[serde(default)]
    pub edges: Vec<StargazerEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StargazerEdge {
    pub starred_at: String,
    pub node: UserNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserNode {
    pub login: String,
}

// ─── Commits ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CommitsData {
    pub repository: Option<CommitsRepository>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitsRepository {
    pub default_branch_ref: Option<CommitsBranchRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitsBranchRef {
    pub target: CommitsTarget,
}

/// `history` is absent when the default branch points at a non-commit object.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitsTarget {
    #[serde(default)]
    pub history: Option<CommitConnection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitConnection {
    pub total_count: u64,
    #[serde(default)]
    pub edges: Vec<CommitEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitEdge {
    pub node: CommitNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitNode {
    pub id: String,
    pub committed_date: String,
    pub url: String,
    pub additions: u64,
    pub deletions: u64,
    pub committer: Option<Committer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Committer {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fixtures::repo_edge_json;
    use serde_json::json;

    #[test]
    fn search_page_deserializes_aliased_fields() {
        let data: SearchData = serde_json::from_value(json!({
            "search": {
                "repositoryCount": 1,
                "pageInfo": {"endCursor": "Y3Vyc29yOjE=", "hasNextPage": false},
                "repos": [repo_edge_json("https://github.com/uw-madison/ospo")]
            }
        }))
        .expect("search page should deserialize");

        assert_eq!(data.search.repository_count, 1);
        assert_eq!(data.search.page_info.end_cursor.as_deref(), Some("Y3Vyc29yOjE="));
        let node = &data.search.repos[0].repo;
        assert_eq!(node.owner.login, "uw-madison");
        assert_eq!(node.total_issues.total_count, 5);
        assert_eq!(node.open_issues.total_count, 2);
        assert!(node.readme_lower.is_none());
    }

    #[test]
    fn raw_search_page_keeps_unmodeled_fields() {
        let mut edge = repo_edge_json("https://github.com/uw-madison/ospo");
        edge["repo"]["isArchived"] = json!(false);

        let data: SearchData<serde_json::Value> = serde_json::from_value(json!({
            "search": {
                "repositoryCount": 1,
                "pageInfo": {"endCursor": null, "hasNextPage": false},
                "repos": [edge]
            }
        }))
        .expect("raw page should deserialize");

        assert_eq!(data.search.repos[0]["repo"]["isArchived"], false);
        let decoded = decode_repo_edges(data.search.repos).expect("edge matches schema");
        assert_eq!(decoded[0].repo.forks.total_count, 3);
    }

    #[test]
    fn decode_rejects_batch_with_one_malformed_edge() {
        let mut bad = repo_edge_json("https://github.com/o/bad");
        bad["repo"].as_object_mut().expect("object").remove("watchers");

        let err = decode_repo_edges(vec![repo_edge_json("https://github.com/o/good"), bad])
            .expect_err("second edge is malformed");
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn node_without_fork_count_is_a_json_parse_error() {
        let mut value = repo_edge_json("https://github.com/o/r");
        value["repo"].as_object_mut().expect("object").remove("forks");

        let err = serde_json::from_value::<RepoEdge>(value)
            .map_err(ParseError::from)
            .expect_err("forks is required");
        assert!(matches!(err, ParseError::Json(_)));
        assert!(err.to_string().contains("forks"));
    }

    #[test]
    fn node_without_watcher_or_open_issue_counts_is_rejected() {
        for field in ["watchers", "open_issues"] {
            let mut value = repo_edge_json("https://github.com/o/r");
            value["repo"].as_object_mut().expect("object").remove(field);
            assert!(
                serde_json::from_value::<RepoEdge>(value).is_err(),
                "{field} should be required"
            );
        }
    }

    #[test]
    fn node_without_license_parses_as_unlicensed() {
        let mut value = repo_edge_json("https://github.com/o/r");
        value["repo"].as_object_mut().expect("object").remove("licenseInfo");

        let edge: RepoEdge = serde_json::from_value(value).expect("edge should deserialize");
        assert!(edge.repo.license_info.is_none());
    }

    #[test]
    fn missing_required_field_is_a_schema_error() {
        let mut value = repo_edge_json("https://github.com/o/r");
        value["repo"].as_object_mut().expect("object").remove("url");
        assert!(serde_json::from_value::<RepoEdge>(value).is_err());
    }

    #[test]
    fn commit_history_deserializes_optional_committer() {
        let data: CommitsData = serde_json::from_value(json!({
            "repository": {
                "defaultBranchRef": {"target": {"history": {
                    "totalCount": 1,
                    "edges": [{"node": {
                        "id": "C_1",
                        "committedDate": "2020-01-01T00:00:00Z",
                        "url": "https://github.com/o/r/commit/1",
                        "additions": 3,
                        "deletions": 1,
                        "committer": null
                    }}],
                    "pageInfo": {"endCursor": null, "hasNextPage": false}
                }}}
            }
        }))
        .expect("commit page should deserialize");

        let history = data
            .repository
            .and_then(|r| r.default_branch_ref)
            .and_then(|b| b.target.history)
            .expect("history present");
        assert_eq!(history.edges.len(), 1);
        assert!(history.edges[0].node.committer.is_none());
    }
}
