//! GitHub API error types.

use thiserror::Error;

use crate::http::HttpError;
use crate::parse::ParseError;

/// A failed round trip: the request never completed or came back non-2xx.
///
/// This is the only error class the client retries.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Http(#[from] HttpError),

    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },
}

/// Errors that can occur when interacting with the GitHub GraphQL API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The API answered 2xx but reported errors and no data.
    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Whether an error is worth retrying.
pub fn is_transient(e: &GitHubError) -> bool {
    matches!(e, GitHubError::Transport(_))
}

/// Truncate an error body for logs and error messages.
pub(crate) fn short_body(body: &[u8]) -> String {
    const MAX: usize = 200;
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.chars().count() > MAX {
        let truncated: String = text.chars().take(MAX).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_errors_are_transient() {
        let status = GitHubError::Transport(TransportError::Status {
            status: 502,
            message: "Bad Gateway".to_string(),
        });
        assert!(is_transient(&status));

        let network = GitHubError::Transport(TransportError::Http(HttpError::Transport(
            "connection reset".to_string(),
        )));
        assert!(is_transient(&network));

        assert!(!is_transient(&GitHubError::Parse(ParseError::MissingCursor)));
        assert!(!is_transient(&GitHubError::GraphQl(vec!["bad".to_string()])));
        assert!(!is_transient(&GitHubError::Config("no token".to_string())));
    }

    #[test]
    fn graphql_error_joins_messages() {
        let err = GitHubError::GraphQl(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(err.to_string(), "GraphQL error: first; second");
    }

    #[test]
    fn short_body_truncates_long_bodies() {
        let long = "x".repeat(500);
        let short = short_body(long.as_bytes());
        assert_eq!(short.len(), 203);
        assert!(short.ends_with("..."));
        assert_eq!(short_body(b"  Bad Gateway \n"), "Bad Gateway");
    }
}
