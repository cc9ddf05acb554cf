//! GitHub GraphQL client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::error::{GitHubError, TransportError, short_body};
use super::pagination::GraphQlExecutor;
use super::types::GraphQlResponse;
use crate::crawl::ProgressCallback;
use crate::http::reqwest_transport::{DEFAULT_REQUEST_TIMEOUT, ReqwestTransport};
use crate::http::{HttpRequest, HttpTransport};
use crate::parse::ParseError;
use crate::retry::{RetryPolicy, with_retry};

/// GraphQL endpoint of github.com.
pub const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// Pause after every successful request.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(2);

const USER_AGENT: &str = concat!("ospo-stats/", env!("CARGO_PKG_VERSION"));

/// GitHub GraphQL client.
///
/// Requests are sent one at a time. Transport failures are retried under the
/// client's [`RetryPolicy`]; every successful round trip is followed by a
/// fixed cool-down so consecutive requests stay under the rate limit.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    token: String,
    retry_policy: RetryPolicy,
    cooldown: Duration,
}

impl GitHubClient {
    /// Create a client backed by reqwest.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = GitHubClient::new(&token)?;
    /// let data = client.execute(&query, None).await?;
    /// ```
    pub fn new(token: &str) -> Result<Self, GitHubError> {
        if token.trim().is_empty() {
            return Err(GitHubError::Config("GitHub token is empty".to_string()));
        }

        let transport = ReqwestTransport::with_timeout(DEFAULT_REQUEST_TIMEOUT)
            .map_err(|e| GitHubError::Config(e.to_string()))?;

        Ok(Self::new_with_transport(token, Arc::new(transport)))
    }

    pub fn new_with_transport(token: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            endpoint: GRAPHQL_ENDPOINT.to_string(),
            token: token.to_string(),
            retry_policy: RetryPolicy::default(),
            cooldown: DEFAULT_COOLDOWN,
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// One POST, no retry. Non-2xx statuses are transport errors.
    async fn post_once(&self, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        let request = HttpRequest::post_json(
            self.endpoint.clone(),
            vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), USER_AGENT.to_string()),
                ("Authorization".to_string(), format!("Bearer {}", self.token)),
            ],
            body.to_vec(),
        );

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                message: short_body(&response.body),
            });
        }

        Ok(response.body)
    }
}

#[async_trait]
impl GraphQlExecutor for GitHubClient {
    async fn execute(
        &self,
        query: &str,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<serde_json::Value, GitHubError> {
        let body = serde_json::to_vec(&serde_json::json!({ "query": query }))
            .map_err(ParseError::from)?;

        let bytes = with_retry(
            || self.post_once(&body),
            &self.retry_policy,
            |_: &TransportError| true,
            "graphql",
            on_progress,
        )
        .await?;

        tokio::time::sleep(self.cooldown).await;

        let envelope: GraphQlResponse<serde_json::Value> =
            serde_json::from_slice(&bytes).map_err(ParseError::from)?;
        let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();

        match envelope.data {
            Some(data) if !data.is_null() => {
                if !messages.is_empty() {
                    tracing::warn!(errors = %messages.join("; "), "GraphQL returned partial data");
                }
                Ok(data)
            }
            _ if !messages.is_empty() => Err(GitHubError::GraphQl(messages)),
            _ => Err(ParseError::MissingField("data").into()),
        }
    }
}
