/*
[INPUT]:  Parsed subcommands and loaded configuration
[OUTPUT]: Interactive terminal front ends for each flow
[POS]:    CLI layer - subcommand implementations
[UPDATE]: When adding or removing subcommands
*/

pub mod init;
pub mod job;
pub mod listen;
pub mod message;
pub mod prompt;
pub mod reset;

use anyhow::{Context, Result};
use cleanline_adapter::{AuthManager, CleanlineClient, Session};
use cleanline_cli::CleanlineConfig;
use tracing::warn;

pub fn client_from(config: &CleanlineConfig) -> Result<CleanlineClient> {
    CleanlineClient::with_config_and_base_url(config.client_config(), &config.api.base_url)
        .context("build API client")
}

/// Prompt for the password, sign in and join the realtime channel
pub async fn open_session(config: &CleanlineConfig, email: &str) -> Result<Session> {
    let password = prompt::password("Password")?;
    let auth = AuthManager::new(client_from(config)?);
    Session::establish(&auth, email, &password, &config.api.realtime_url)
        .await
        .map_err(|err| {
            warn!(error = %err, retryable = err.is_retryable(), "sign in failed");
            prompt::banner(&err.user_message());
            err
        })
        .context("sign in")
}
