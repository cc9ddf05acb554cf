//! Field-level parsing shared by every data source.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use thiserror::Error;

/// Wire format of every timestamp returned by the GraphQL API.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Number of days since the last push for a repository to count as active.
pub const ACTIVE_WINDOW_DAYS: i64 = 365;

/// Errors raised while decoding a response or a single record.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body did not match the expected response schema.
    #[error("response does not match schema: {0}")]
    Json(#[from] serde_json::Error),

    /// A timestamp field was not in the expected format.
    #[error("invalid timestamp in {field}: {value:?}")]
    Timestamp { field: &'static str, value: String },

    /// A required nested value was absent or null.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A page reported more results without a continuation cursor.
    #[error("page reports hasNextPage but carries no endCursor")]
    MissingCursor,

    /// A repository URL could not be split into owner and name.
    #[error("not a repository URL: {0}")]
    InvalidUrl(String),
}

static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("markdown image pattern is valid")
});

static HTML_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*\bsrc\s*=\s*["'][^"']*["'][^>]*>"#)
        .expect("html image pattern is valid")
});

/// Parse a `YYYY-MM-DDTHH:MM:SSZ` timestamp.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, ParseError> {
    parse_timestamp_with(field, value, TIMESTAMP_FORMAT)
}

/// Parse a UTC timestamp in an arbitrary `chrono` format.
pub fn parse_timestamp_with(
    field: &'static str,
    value: &str,
    format: &str,
) -> Result<DateTime<Utc>, ParseError> {
    NaiveDateTime::parse_from_str(value, format)
        .map(|naive| naive.and_utc())
        .map_err(|_| ParseError::Timestamp {
            field,
            value: value.to_string(),
        })
}

/// Whether README text embeds an image, either as Markdown `![alt](src)` or
/// as an HTML `<img src="...">` tag.
#[must_use]
pub fn readme_has_image(text: &str) -> bool {
    MARKDOWN_IMAGE.is_match(text) || HTML_IMAGE.is_match(text)
}

/// Split a repository URL (`https://host/owner/name`) into owner and name.
///
/// A trailing `.git` suffix on the name is dropped.
pub fn owner_and_name(repo_url: &str) -> Result<(String, String), ParseError> {
    let invalid = || ParseError::InvalidUrl(repo_url.to_string());

    let parsed = url::Url::parse(repo_url).map_err(|_| invalid())?;
    let mut segments = parsed
        .path_segments()
        .ok_or_else(invalid)?
        .filter(|s| !s.is_empty());

    let owner = segments.next().ok_or_else(invalid)?;
    let name = segments.next().ok_or_else(invalid)?;
    let name = name.strip_suffix(".git").unwrap_or(name);

    if name.is_empty() {
        return Err(invalid());
    }

    Ok((owner.to_string(), name.to_string()))
}

/// Activity flag: true when the last push is within [`ACTIVE_WINDOW_DAYS`]
/// days of the crawl, unknown when the push time is unknown.
#[must_use]
pub fn activity_flag(crawl_at: DateTime<Utc>, last_pushed_at: Option<DateTime<Utc>>) -> Option<bool> {
    last_pushed_at.map(|pushed| (crawl_at - pushed).num_days() <= ACTIVE_WINDOW_DAYS)
}

/// Treat empty or whitespace-only strings as absent.
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
