// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;

#[test]
fn test_second_lock_is_refused() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("matches.db");

    let held = RunLock::acquire(&db).unwrap();
    assert!(held.path().ends_with("matches.db.lock"));

    let err = RunLock::acquire(&db).unwrap_err();
    assert!(matches!(err, Error::SyncLocked(_)));
}

#[test]
fn test_lock_released_on_drop() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("matches.db");

    drop(RunLock::acquire(&db).unwrap());
    assert!(RunLock::acquire(&db).is_ok());
}

#[test]
fn test_locks_are_per_store() {
    let temp = TempDir::new().unwrap();
    let _a = RunLock::acquire(&temp.path().join("a.db")).unwrap();
    assert!(RunLock::acquire(&temp.path().join("b.db")).is_ok());
}

#[test]
fn test_creates_missing_parent() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("nested").join("matches.db");
    let lock = RunLock::acquire(&db).unwrap();
    assert!(lock.path().exists());
}
