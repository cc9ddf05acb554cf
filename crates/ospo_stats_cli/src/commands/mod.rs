pub(crate) mod discover;
pub(crate) mod enrich;
pub(crate) mod history;
pub(crate) mod import;
pub(crate) mod migrate;
pub(crate) mod stats;

use std::time::Duration;

use ospo_stats::github::GitHubClient;
use sea_orm::DatabaseConnection;

use crate::config::Config;

pub(crate) type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Connect and bring the schema up to date.
pub(crate) async fn connect(database_url: &str) -> Result<DatabaseConnection, Box<dyn std::error::Error>> {
    Ok(ospo_stats::connect_and_migrate(database_url).await?)
}

/// Build the GitHub client from configuration.
pub(crate) fn github_client(config: &Config) -> Result<GitHubClient, Box<dyn std::error::Error>> {
    let token = config.github_token().ok_or(
        "GitHub token not configured. Set OSPO_GITHUB_TOKEN or GITHUB_TOKEN, \
         or add token to [github] in the config file",
    )?;
    let client = GitHubClient::new(&token)?
        .with_cooldown(Duration::from_secs(config.github.cooldown_secs));
    tracing::debug!(
        endpoint = client.endpoint(),
        cooldown_secs = client.cooldown().as_secs(),
        "GitHub client ready"
    );
    Ok(client)
}
