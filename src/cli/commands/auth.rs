//! Credential check command.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::ResultExt;

use super::{CredentialArgs, build_client};

/// Exchange the client credentials for a token and report the result
pub fn cmd_check_auth(
    rt: &Runtime,
    config: &Config,
    credentials: &CredentialArgs,
) -> anyhow::Result<()> {
    let mut client = build_client(config, credentials)?;

    println!("Requesting access token from {}", config.catalog.token_url);

    rt.block_on(client.refresh_credential())
        .with_context("checking client credentials")?;

    println!(
        "✓ Credentials accepted for client {}",
        client.credentials().client_id()
    );
    Ok(())
}
