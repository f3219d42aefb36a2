// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::time::Duration;

// --- Duration helper (private) ---

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

// --- Daemon binary ---

pub fn daemon_binary() -> Option<String> {
    std::env::var("FDK_DAEMON_BINARY").ok()
}

// --- Timeouts ---

pub fn timeout_exit_ms() -> Option<Duration> {
    parse_duration_ms("FDK_TIMEOUT_EXIT_MS")
}
pub fn timeout_start_ms() -> Option<Duration> {
    parse_duration_ms("FDK_TIMEOUT_START_MS")
}
pub fn poll_ms() -> Option<Duration> {
    parse_duration_ms("FDK_POLL_MS")
}
