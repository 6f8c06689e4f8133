//! Artist Explorer - walks the related-artists graph of a music catalog.
//!
//! Seed artists come from the catalog's featured playlists (or the command
//! line); every artist found is recorded once and expanded through its
//! related artists until nothing new turns up. Rate limits and expired tokens
//! are recovered from without ending the session.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod explorer;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; stdout is reserved for --jsonl output
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("artist_explorer=info".parse()?)
                .add_directive("catalog=info".parse()?)
                .add_directive("explorer=info".parse()?),
        )
        .init();

    cli::run_command(&args)
}
