// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use ms_core::RankPolicy;

use crate::config::DEFAULT_CONFIG_FILE;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Rank policy as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Ranked 1v1 matches longer than the minimum duration
    DurationGated,
    /// Any ranked or unranked 1v1 queue match
    QueueType,
}

impl From<PolicyArg> for RankPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::DurationGated => RankPolicy::DurationGated,
            PolicyArg::QueueType => RankPolicy::QueueType,
        }
    }
}

const QUICKSTART_HELP: &str = "\
Get started:
  matchsync init --base-url https://host/matches --db matches
  matchsync sync --dry-run      Show what a sync would fetch
  matchsync sync                Fetch new and changed matches
  matchsync status              Show cursor and store counts";

#[derive(Parser)]
#[command(name = "matchsync", version)]
#[command(about = "Sync a remote match history into a local store")]
#[command(
    long_about = "Sync a remote match history into a local store.\n\n\
    New matches are fetched newest-first and indexed oldest-first. Matches that were \
    still in progress are re-fetched until their final state is recorded."
)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Config file (JSON, or TOML when the name ends in .toml)
    #[arg(
        long,
        short = 'c',
        global = true,
        env = "MATCHSYNC_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a fresh config with a zero cursor
    #[command(after_help = "Examples:\n  \
        matchsync init --base-url https://host/matches --db matches\n  \
        matchsync -c ashes.toml init --base-url https://host/m --db ashes --force")]
    Init {
        /// Remote match history endpoint
        #[arg(long, value_name = "URL")]
        base_url: String,

        /// Local store name, resolved next to the config file
        #[arg(long, value_name = "NAME")]
        db: String,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,

        /// Rank policy to record in the config
        #[arg(long, value_enum)]
        rank_policy: Option<PolicyArg>,
    },

    /// Fetch new matches and re-fetch incomplete ones
    #[command(after_help = "Examples:\n  \
        matchsync sync                    Run one sync\n  \
        matchsync sync --dry-run          Plan only, fetch no pages\n  \
        matchsync sync --max-matches 500  Raise the per-run cap")]
    Sync {
        /// Compute what would be fetched without fetching pages
        #[arg(long)]
        dry_run: bool,

        /// Per-run fetch cap for this run (0 = unlimited)
        #[arg(long, value_name = "N")]
        max_matches: Option<u64>,

        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show cursor and store counts
    Status {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List matches eligible for rating, oldest first
    Rankable {
        /// Maximum number of matches to show
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List incomplete matches inside the reconciliation window
    Incomplete {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
