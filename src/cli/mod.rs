//! Command-line interface for artist-explorer.
//!
//! This module provides CLI commands for running an exploration session,
//! verifying credentials and bootstrapping the config file.

mod commands;

pub use commands::{Cli, Commands, run_command};
