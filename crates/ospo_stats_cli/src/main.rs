//! ospo-stats CLI - command-line interface for the repository crawler.

mod commands;
mod config;
mod progress;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::discover::DiscoverArgs;
use crate::commands::enrich::EnrichArgs;
use crate::commands::history::HistoryArgs;

#[derive(Parser)]
#[command(name = "ospo-stats")]
#[command(version)]
#[command(about = "Crawl repository metadata and history into a database")]
#[command(
    long_about = "ospo-stats discovers GitHub repositories matching a search term, crawls \
their commit and stargazer history, and stores everything in a local database. \
Stored repositories can be classified and summarized by year."
)]
#[command(after_long_help = r#"EXAMPLES
    Discover repositories mentioning an institution, keeping raw snapshots:
        $ ospo-stats discover wisc.edu --output-dir data/raw

    Crawl history for every stored repository:
        $ ospo-stats history

    Re-crawl one repository:
        $ ospo-stats history --url https://github.com/uw-madison/ospo --no-skip-existing

    Classify repositories without a category:
        $ ospo-stats enrich --batch-size 5

CONFIGURATION
    ospo-stats reads configuration from:
      1. ~/.config/ospo-stats/config.toml (or $XDG_CONFIG_HOME/ospo-stats/config.toml)
      2. ./ospo-stats.toml
      3. Environment variables (OSPO_* prefix, e.g., OSPO_GITHUB_TOKEN)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    OSPO_DATABASE_URL         Database connection string (default: ~/.local/state/ospo-stats/ospo.db)
    OSPO_GITHUB_TOKEN         GitHub personal access token (falls back to GITHUB_TOKEN)
    OSPO_ANTHROPIC_API_KEY    Anthropic API key for enrich (falls back to ANTHROPIC_API_KEY)
    RUST_LOG                  Log filter (default: ospo_stats=info,ospo_stats_cli=info)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Discover repositories matching search terms, year by year
    Discover(DiscoverArgs),
    /// Crawl commit and stargazer history
    History(HistoryArgs),
    /// Refresh activity flags and classify repositories
    Enrich(EnrichArgs),
    /// Re-import raw discovery snapshots from a directory
    ImportSnapshots {
        /// Directory containing repos_<term>_<year>.json files
        dir: PathBuf,
    },
    /// Import a GitLab project CSV export
    ImportGitlab {
        /// Path to the CSV export
        csv: PathBuf,
    },
    /// Print yearly counts
    Stats {
        #[command(subcommand)]
        action: StatsAction,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum StatsAction {
    /// Repositories by creation year
    Repos,
    /// Commits by commit year
    Commits,
    /// Stars by the year they were given
    Stargazers,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("ospo_stats=info,ospo_stats_cli=info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    shutdown::setup_shutdown_handler();

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();

    let database_url = config
        .database_url()
        .ok_or("Could not determine a database URL; set OSPO_DATABASE_URL")?;

    // Ensure the database directory exists for SQLite
    if database_url.starts_with("sqlite://") {
        let db_path = database_url.trim_start_matches("sqlite://");
        // Strip query parameters (e.g., ?mode=rwc) before path operations
        let db_path = db_path.split('?').next().unwrap_or(db_path);
        let db_path = std::path::Path::new(db_path);

        if db_path.is_relative() && !db_path.as_os_str().is_empty() {
            tracing::warn!(
                "Database path '{}' is relative - behavior depends on current directory. \
                 Consider using an absolute path.",
                db_path.display()
            );
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
    }

    match cli.command {
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await?;
        }
        Commands::Discover(args) => {
            commands::discover::handle_discover(args, &config, &database_url).await?;
        }
        Commands::History(args) => {
            commands::history::handle_history(args, &config, &database_url).await?;
        }
        Commands::Enrich(args) => {
            commands::enrich::handle_enrich(args, &config, &database_url).await?;
        }
        Commands::ImportSnapshots { dir } => {
            commands::import::handle_import_snapshots(&dir, &database_url).await?;
        }
        Commands::ImportGitlab { csv } => {
            commands::import::handle_import_gitlab(&csv, &database_url).await?;
        }
        Commands::Stats { action } => {
            commands::stats::handle_stats(action, &database_url).await?;
        }
    }

    Ok(())
}
