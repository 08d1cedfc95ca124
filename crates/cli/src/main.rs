// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use matchsync::Cli;

fn main() {
    let cli = Cli::parse();
    matchsync::logging::init(cli.log_file.as_deref());
    if let Err(e) = matchsync::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
