// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! matchsync - keep a local copy of a remote match history.
//!
//! This crate wires the [`ms_core`] sync engine to an HTTP remote, a
//! config file holding the sync cursor, and the `matchsync` command line.
//!
//! # Main Components
//!
//! - [`Config`] / [`ConfigFile`] - cursor and tuning, saved atomically
//! - [`HttpMatchSource`] - the remote match history over HTTP
//! - [`RunLock`] - one sync per store at a time
//! - [`Error`] - Error types for all operations

mod cli;
mod commands;
mod display;

pub mod config;
pub mod error;
pub mod http;
pub mod lock;
pub mod logging;

pub use cli::{Cli, Command, OutputFormat, PolicyArg};
pub use config::{Config, ConfigFile};
pub use error::{Error, Result};
pub use http::HttpMatchSource;
pub use lock::RunLock;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let config = cli.config;
    match cli.command {
        Command::Init {
            base_url,
            db,
            force,
            rank_policy,
        } => commands::init::run(&config, base_url, db, force, rank_policy.map(Into::into)),
        Command::Sync {
            dry_run,
            max_matches,
            output,
        } => commands::sync::run(&config, dry_run, max_matches, output),
        Command::Status { output } => commands::status::run(&config, output),
        Command::Rankable { limit, output } => commands::rankable::run(&config, limit, output),
        Command::Incomplete { output } => commands::incomplete::run(&config, output),
    }
}
