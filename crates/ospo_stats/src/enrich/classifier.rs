//! Classifier seam and prompt construction.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::http::HttpError;

/// Default label vocabulary.
pub const DEFAULT_LABELS: [&str; 2] = ["Software", "Course Material"];

/// Characters of input kept before truncation.
pub const DEFAULT_TRIM_TO: usize = 500;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    #[error("classifier returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unreadable classifier reply: {0}")]
    Parse(String),

    #[error("classifier configuration: {0}")]
    Config(String),
}

impl ClassifierError {
    /// Network failures, throttling and server errors are worth another try.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClassifierError::Transport(_) => true,
            ClassifierError::Status { status, .. } => *status == 429 || *status >= 500,
            ClassifierError::Parse(_) | ClassifierError::Config(_) => false,
        }
    }
}

/// Label vocabulary and input shaping for one classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyOptions {
    pub labels: Vec<String>,
    /// Let the classifier invent a label when none fits.
    pub allow_extra: bool,
    pub trim_to: usize,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|l| (*l).to_string()).collect(),
            allow_extra: true,
            trim_to: DEFAULT_TRIM_TO,
        }
    }
}

/// Maps free text (name, description, README) to a category label.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn categorize(&self, text: &str, options: &ClassifyOptions) -> Result<String, ClassifierError>;
}

/// Keep the first `trim_to` characters, marking a cut with `...`.
pub fn trim_text(text: &str, trim_to: usize) -> String {
    match text.char_indices().nth(trim_to) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// The user prompt sent for one classification.
pub fn categorization_prompt(text: &str, options: &ClassifyOptions) -> String {
    let labels = options.labels.join(", ");
    let extra = if options.allow_extra {
        "If none of the options fits the content, come up with a new category."
    } else {
        ""
    };
    format!(
        "Categorize below readme content as one of these options: {labels}. \
         Use JSON format with the key: category. {extra}\n <readme>{}</readme>",
        trim_text(text, options.trim_to)
    )
}

#[derive(Deserialize)]
struct CategoryReply {
    category: String,
}

/// Extract the label from a `{"category": "..."}` reply, tolerating prose
/// around the JSON object.
pub fn parse_category(reply: &str) -> Result<String, ClassifierError> {
    let object = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => reply,
    };
    let parsed: CategoryReply = serde_json::from_str(object)
        .map_err(|e| ClassifierError::Parse(format!("{e}: {reply}")))?;

    let category = parsed.category.trim();
    if category.is_empty() {
        return Err(ClassifierError::Parse("empty category".to_string()));
    }
    Ok(category.to_string())
}
