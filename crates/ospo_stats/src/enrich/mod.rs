//! Post-crawl enrichment: activity flag and category label.

mod anthropic;
mod batch;
mod classifier;

pub use anthropic::{ANTHROPIC_VERSION, AnthropicClassifier, DEFAULT_MODEL, MESSAGES_ENDPOINT};
pub use batch::{DEFAULT_ENRICH_BATCH_SIZE, EnrichOptions, EnrichSummary, enrich_repositories};
pub use classifier::{
    Classifier, ClassifierError, ClassifyOptions, DEFAULT_LABELS, DEFAULT_TRIM_TO,
    categorization_prompt, parse_category, trim_text,
};
