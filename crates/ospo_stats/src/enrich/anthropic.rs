//! Anthropic Messages API classifier.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::http::reqwest_transport::{DEFAULT_REQUEST_TIMEOUT, ReqwestTransport};
use crate::http::{HttpRequest, HttpTransport};
use crate::retry::{RetryPolicy, with_retry};

use super::classifier::{Classifier, ClassifierError, ClassifyOptions, categorization_prompt, parse_category};

pub const MESSAGES_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 100;

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Classifier backed by the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicClassifier {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    api_key: String,
    model: String,
    retry_policy: RetryPolicy,
}

impl AnthropicClassifier {
    pub fn new(api_key: &str) -> Result<Self, ClassifierError> {
        if api_key.trim().is_empty() {
            return Err(ClassifierError::Config("Anthropic API key is empty".to_string()));
        }
        let transport = ReqwestTransport::with_timeout(DEFAULT_REQUEST_TIMEOUT)
            .map_err(|e| ClassifierError::Config(e.to_string()))?;
        Ok(Self::new_with_transport(api_key, Arc::new(transport)))
    }

    pub fn new_with_transport(api_key: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            endpoint: MESSAGES_ENDPOINT.to_string(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            retry_policy: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
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

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post_once(&self, body: &[u8]) -> Result<Vec<u8>, ClassifierError> {
        let request = HttpRequest::post_json(
            self.endpoint.clone(),
            vec![
                ("x-api-key".to_string(), self.api_key.clone()),
                ("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string()),
            ],
            body.to_vec(),
        );

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            let message: String = String::from_utf8_lossy(&response.body).chars().take(200).collect();
            return Err(ClassifierError::Status {
                status: response.status,
                message,
            });
        }
        Ok(response.body)
    }
}

#[async_trait]
impl Classifier for AnthropicClassifier {
    async fn categorize(&self, text: &str, options: &ClassifyOptions) -> Result<String, ClassifierError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "temperature": 0,
            "messages": [{
                "role": "user",
                "content": [{"type": "text", "text": categorization_prompt(text, options)}],
            }],
        });
        let body = serde_json::to_vec(&body).map_err(|e| ClassifierError::Parse(e.to_string()))?;

        let bytes = with_retry(
            || self.post_once(&body),
            &self.retry_policy,
            ClassifierError::is_retryable,
            "classifier",
            None,
        )
        .await?;

        let response: MessagesResponse =
            serde_json::from_slice(&bytes).map_err(|e| ClassifierError::Parse(e.to_string()))?;
        let reply = response
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| ClassifierError::Parse("reply has no text block".to_string()))?;

        parse_category(&reply)
    }
}
