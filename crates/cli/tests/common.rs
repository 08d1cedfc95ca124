// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub const BASE_URL: &str = "https://api.example.test/matches";

/// `matchsync` running in `dir`, isolated from the caller's environment.
pub fn matchsync(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("matchsync");
    cmd.current_dir(dir.path())
        .env_remove("MATCHSYNC_CONFIG")
        .env("MATCHSYNC_LOG", "warn");
    cmd
}

/// Helper to create a temp directory with an initialized config
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    matchsync(&temp)
        .args(["init", "--base-url", BASE_URL, "--db", "matches"])
        .assert()
        .success();
    temp
}

/// A base URL nothing is listening on.
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/matches")
}
