// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    no_marker = { "ERROR Failed to start daemon: boom\n", None },
    clean_start = { "--- fdkd: starting (pid: 42)\nINFO Starting fdkd\n", None },
    lock_error = {
        "--- fdkd: starting (pid: 42)\nERROR Failed to start daemon: IO error: permission denied\n",
        Some("IO error: permission denied")
    },
)]
fn parses_errors_after_last_marker(log: &str, expected: Option<&str>) {
    assert_eq!(parse_startup_error(log).as_deref(), expected);
}

#[test]
fn only_latest_startup_is_considered() {
    let log = "--- fdkd: starting (pid: 1)\n\
               ERROR Failed to start daemon: old failure\n\
               --- fdkd: starting (pid: 2)\n\
               INFO Daemon ready\n";
    assert_eq!(parse_startup_error(log), None);
}

#[test]
fn read_startup_error_from_missing_log_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(read_startup_error(&dir.path().join("fdkd.log")), None);
}

#[test]
fn own_process_exists() {
    assert!(process_exists(std::process::id()));
}

#[tokio::test]
async fn wait_for_exit_sees_finished_child() {
    let mut child = Command::new("true").spawn().unwrap();
    let pid = child.id();
    // Reap so the pid no longer exists
    child.wait().unwrap();

    assert!(wait_for_exit(pid, Duration::from_secs(2)).await);
}

#[tokio::test]
async fn wait_for_exit_times_out_on_live_process() {
    assert!(!wait_for_exit(std::process::id(), Duration::from_millis(100)).await);
}
