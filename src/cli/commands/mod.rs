//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `explore`: Run an exploration session
//! - `auth`: Verify client credentials
//! - `init`: Write a default config file

mod auth;
mod explore;
mod init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::catalog::{CatalogClient, ClientCredentials, CredentialManager, ReqwestTransport};
use crate::config::{self, Config};
use crate::error::{Error, Result, ResultExt};
use crate::explorer::FailurePolicy;

pub use auth::cmd_check_auth;
pub use explore::cmd_explore;
pub use init::cmd_init_config;

/// Artist Explorer CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Walk the related-artists graph from featured playlists (or given seeds)
    Explore {
        #[command(flatten)]
        credentials: CredentialArgs,
        /// Seed artist id (repeatable); skips featured playlist discovery
        #[arg(long = "seed", value_name = "ARTIST_ID")]
        seeds: Vec<String>,
        /// Print each recorded artist as a JSON line on stdout
        #[arg(long)]
        jsonl: bool,
        /// What to do when a lookup fails for a reason other than rate limiting
        #[arg(long, value_enum)]
        on_error: Option<FailurePolicy>,
    },
    /// Acquire an access token to verify the client credentials
    CheckAuth {
        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Write a config file with default settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Client credential overrides
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Client id (or set CLIENT_ID env var)
    #[arg(long, env = "CLIENT_ID")]
    pub client_id: Option<String>,
    /// Client secret (or set CLIENT_SECRET env var)
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let result = dispatch(cli);
    if let Err(err) = &result {
        if let Some(hint) = credentials_hint(err) {
            eprintln!("{}", hint);
        }
    }
    result
}

fn dispatch(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Explore {
            credentials,
            seeds,
            jsonl,
            on_error,
        } => {
            let rt = Runtime::new()?;
            let config = load_config(cli)?;
            cmd_explore(&rt, &config, credentials, seeds, *jsonl, *on_error)?;
        }
        Commands::CheckAuth { credentials } => {
            let rt = Runtime::new()?;
            let config = load_config(cli)?;
            cmd_check_auth(&rt, &config, credentials)?;
        }
        Commands::InitConfig { force } => {
            cmd_init_config(cli.config.as_deref(), *force)?;
        }
    }
    Ok(())
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Where to supply credentials, when the error says they are missing or rejected
pub(crate) fn credentials_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.downcast_ref::<Error>()
        .filter(|e| e.is_credentials())
        .map(|_| {
            "Hint: pass --client-id/--client-secret, set CLIENT_ID/CLIENT_SECRET, \
             or fill the [credentials] section of the config file (see init-config)"
        })
}

/// Load the explicit `--config` file strictly, or the default one leniently
pub(crate) fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => config::load_from(path).with_context("loading --config"),
        None => Ok(config::load()),
    }
}

/// Build a catalog client from config, with flags and env vars taking precedence
pub(crate) fn build_client(
    config: &Config,
    overrides: &CredentialArgs,
) -> Result<CatalogClient<ReqwestTransport>> {
    let credentials = ClientCredentials::new(
        overrides
            .client_id
            .clone()
            .or_else(|| config.credentials.client_id.clone()),
        overrides
            .client_secret
            .clone()
            .or_else(|| config.credentials.client_secret.clone()),
    )?;

    let catalog = &config.catalog;
    let transport = ReqwestTransport::new(catalog.request_timeout())
        .map_err(crate::catalog::CatalogError::from)
        .with_context("creating HTTP client")?;
    let manager =
        CredentialManager::new(credentials, &catalog.token_url).with_retry(catalog.retry_policy());

    Ok(CatalogClient::new(transport, manager)
        .with_base_url(&catalog.api_base_url)
        .with_retry(catalog.retry_policy())
        .with_default_retry_after(catalog.default_retry_after()))
}
