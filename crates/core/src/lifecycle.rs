// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent process lifecycle vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the supervised agent process.
///
/// `Stopped -> Running` on a successful spawn; `Running -> Stopped` on an
/// explicit stop or when the agent exits on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Stopped,
    Running,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Stopped => write!(f, "stopped"),
            LifecycleState::Running => write!(f, "running"),
        }
    }
}

/// Result of a non-blocking liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Running,
    /// Process exited. `code` is `None` when it was killed by a signal.
    Exited { code: Option<i32> },
}

impl Liveness {
    pub fn is_alive(&self) -> bool {
        matches!(self, Liveness::Running)
    }
}

/// How the host is allowed to keep the agent alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Platform granted a keep-alive / foreground privilege.
    Foreground,
    /// Best-effort background execution.
    Background,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Foreground => write!(f, "foreground"),
            ExecutionMode::Background => write!(f, "background"),
        }
    }
}

/// Identifies one spawned agent instance.
///
/// Background tasks tag their events with it so that late events from an
/// earlier instance cannot affect the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
