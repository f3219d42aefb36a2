// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon process management utilities.
//!
//! Functions for starting, signalling, and monitoring the fdkd process.

use crate::client::ClientError;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

/// Start the daemon in the background, returning the child process handle
pub fn start_daemon_background() -> Result<std::process::Child, ClientError> {
    let fdkd_path = find_fdkd_binary();

    Command::new(&fdkd_path)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ClientError::DaemonStartFailed(format!("{}: {}", fdkd_path.display(), e)))
}

/// Wait for a process to exit
pub async fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if !process_exists(pid) {
            return true;
        }
        tokio::time::sleep(super::client::poll_interval()).await;
    }
    false
}

/// Find the fdkd binary: FDK_DAEMON_BINARY, then a sibling of this
/// executable, then PATH.
fn find_fdkd_binary() -> PathBuf {
    if let Some(path) = crate::env::daemon_binary() {
        return PathBuf::from(path);
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("fdkd");
            if sibling.exists() {
                return sibling;
            }
        }
    }

    PathBuf::from("fdkd")
}

/// Execute kill command with the given signal and PID
fn kill_signal(signal: &str, pid: u32) -> bool {
    Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Check if a process with the given PID exists
pub fn process_exists(pid: u32) -> bool {
    kill_signal("-0", pid)
}

/// Re-deliver a start command to a running daemon
pub fn send_hangup(pid: u32) -> bool {
    kill_signal("-1", pid)
}

/// Ask the daemon to stop the agent and exit
pub fn send_terminate(pid: u32) -> bool {
    kill_signal("-15", pid)
}

/// Force kill a daemon process
pub fn force_kill_daemon(pid: u32) -> bool {
    kill_signal("-9", pid)
}

/// Startup marker prefix that daemon writes to log before anything else.
const STARTUP_MARKER_PREFIX: &str = "--- fdkd: starting (pid: ";

/// Read daemon log from the last startup marker, looking for errors.
pub fn read_startup_error(log_path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(log_path).ok()?;
    parse_startup_error(&content)
}

/// Parse startup errors from log content (pure logic, no I/O).
fn parse_startup_error(content: &str) -> Option<String> {
    let start_pos = content.rfind(STARTUP_MARKER_PREFIX)?;
    let startup_log = &content[start_pos..];

    let errors: Vec<&str> = startup_log
        .lines()
        .filter(|line| line.contains(" ERROR ") || line.contains("Failed to start"))
        .collect();

    if errors.is_empty() {
        return None;
    }

    let error_messages: Vec<String> = errors
        .iter()
        .filter_map(|line| line.split_once(": ").map(|(_, msg)| msg.to_string()))
        .collect();

    if error_messages.is_empty() {
        Some(errors.join("\n"))
    } else {
        Some(error_messages.join("\n"))
    }
}

#[cfg(test)]
#[path = "daemon_process_tests.rs"]
mod tests;
