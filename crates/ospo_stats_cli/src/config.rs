//! Configuration file support for ospo-stats.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `OSPO_`, e.g., `OSPO_DATABASE_URL`)
//! 3. Config file (./ospo-stats.toml, then ~/.config/ospo-stats/config.toml)
//! 4. Built-in defaults
//!
//! The GitHub token falls back to `GITHUB_TOKEN` and the Anthropic key to
//! `ANTHROPIC_API_KEY`. The database URL defaults to
//! `sqlite://~/.local/state/ospo-stats/ospo.db` on Linux.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "postgres://localhost/ospo"
//!
//! [github]
//! token = "ghp_..."  # or use OSPO_GITHUB_TOKEN / GITHUB_TOKEN
//! cooldown_secs = 2
//!
//! [anthropic]
//! api_key = "sk-ant-..."
//! model = "claude-3-haiku-20240307"
//!
//! [crawl]
//! output_dir = "data/raw"
//! year_min = 2008
//! per_page = 100
//!
//! [enrich]
//! batch_size = 10
//! labels = ["Software", "Course Material"]
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

use ospo_stats::crawl::DEFAULT_YEAR_MIN;
use ospo_stats::enrich::{DEFAULT_ENRICH_BATCH_SIZE, DEFAULT_LABELS, DEFAULT_MODEL};
use ospo_stats::github::DEFAULT_DISCOVERY_PAGE_SIZE;

const APP_NAME: &str = "ospo-stats";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub github: GitHubConfig,
    pub anthropic: AnthropicConfig,
    pub crawl: CrawlConfig,
    pub enrich: EnrichConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Supports sqlite:// and postgres:// schemes.
    pub url: Option<String>,
}

/// GitHub configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token.
    pub token: Option<String>,
    /// Pause after every successful request, in seconds.
    pub cooldown_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            cooldown_secs: ospo_stats::github::DEFAULT_COOLDOWN.as_secs(),
        }
    }
}

/// Anthropic classifier configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Default discovery options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Directory for raw per-year snapshots. Unset disables snapshots.
    pub output_dir: Option<PathBuf>,
    pub year_min: i32,
    pub per_page: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            year_min: DEFAULT_YEAR_MIN,
            per_page: DEFAULT_DISCOVERY_PAGE_SIZE,
        }
    }
}

/// Default enrichment options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    pub batch_size: u64,
    pub labels: Vec<String>,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_ENRICH_BATCH_SIZE,
            labels: DEFAULT_LABELS.iter().map(|l| (*l).to_string()).collect(),
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/ospo-stats/config.toml)
    /// 3. Local config file (./ospo-stats.toml)
    /// 4. Environment variables with OSPO_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("ospo-stats.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./ospo-stats.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., OSPO_DATABASE_URL -> database.url
        builder = builder.add_source(
            Environment::with_prefix("OSPO")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the database URL, falling back to a SQLite file in the state directory.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir()
                .map(|state_dir| ospo_stats::db::sqlite_url(&state_dir.join("ospo.db")))
        })
    }

    /// Get the GitHub token, falling back to `GITHUB_TOKEN`.
    pub fn github_token(&self) -> Option<String> {
        Self::non_blank(self.github.token.clone())
            .or_else(|| Self::non_blank(std::env::var("GITHUB_TOKEN").ok()))
    }

    /// Get the Anthropic API key, falling back to `ANTHROPIC_API_KEY`.
    pub fn anthropic_api_key(&self) -> Option<String> {
        Self::non_blank(self.anthropic.api_key.clone())
            .or_else(|| Self::non_blank(std::env::var("ANTHROPIC_API_KEY").ok()))
    }

    fn non_blank(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.trim().is_empty())
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/ospo-stats` or `~/.local/state/ospo-stats`.
    /// On macOS/Windows, falls back to the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}
