//! Canned GraphQL payloads shared by unit tests.

use serde_json::{Value, json};

pub(crate) fn repo_edge_json(url: &str) -> Value {
    json!({
        "repo": {
            "owner": {"login": "uw-madison"},
            "name": "ospo",
            "url": url,
            "description": "Open source program office tools",
            "homepageUrl": "",
            "createdAt": "2019-04-01T10:00:00Z",
            "pushedAt": "2024-01-15T08:30:00Z",
            "licenseInfo": {"key": "mit", "name": "MIT License"},
            "stargazers": {"totalCount": 12},
            "total_issues": {"totalCount": 5},
            "open_issues": {"totalCount": 2},
            "forks": {"totalCount": 3},
            "watchers": {"totalCount": 4},
            "defaultBranchRef": {"target": {"history": {"totalCount": 120}}},
            "readme_standard": {"text": "# OSPO\n![badge](b.svg)"},
            "readme_lower": null
        }
    })
}

pub(crate) fn search_page(edges: Vec<Value>, total: u64, cursor: Option<&str>, has_next: bool) -> Value {
    json!({
        "search": {
            "repositoryCount": total,
            "pageInfo": {"endCursor": cursor, "hasNextPage": has_next},
            "repos": edges
        }
    })
}

pub(crate) fn stargazers_page(users: &[&str], total: u64, cursor: Option<&str>, has_next: bool) -> Value {
    let edges: Vec<Value> = users
        .iter()
        .map(|u| json!({"starredAt": "2021-06-01T12:00:00Z", "node": {"login": u}}))
        .collect();
    json!({
        "repository": {
            "stargazers": {
                "totalCount": total,
                "edges": edges,
                "pageInfo": {"endCursor": cursor, "hasNextPage": has_next}
            }
        }
    })
}

pub(crate) fn commits_page(shas: &[&str], total: u64, cursor: Option<&str>, has_next: bool) -> Value {
    let edges: Vec<Value> = shas
        .iter()
        .map(|sha| {
            json!({"node": {
                "id": format!("C_{sha}"),
                "committedDate": "2020-02-03T04:05:06Z",
                "url": format!("https://github.com/o/r/commit/{sha}"),
                "additions": 10,
                "deletions": 4,
                "committer": {"name": "Ada", "email": "ada@example.edu"}
            }})
        })
        .collect();
    json!({
        "repository": {
            "defaultBranchRef": {"target": {"history": {
                "totalCount": total,
                "edges": edges,
                "pageInfo": {"endCursor": cursor, "hasNextPage": has_next}
            }}}
        }
    })
}
