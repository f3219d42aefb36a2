// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::time::Duration;

/// Default watchdog liveness poll interval.
pub const DEFAULT_WATCHDOG_POLL: Duration = Duration::from_secs(1);

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Watchdog poll interval (default: 1000ms, override `FDK_WATCHDOG_POLL_MS`).
pub fn watchdog_poll_ms() -> Duration {
    parse_duration_ms("FDK_WATCHDOG_POLL_MS").unwrap_or(DEFAULT_WATCHDOG_POLL)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
