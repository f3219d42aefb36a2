// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events and signals flowing into the supervising loop.
//!
//! Background tasks never act on the supervisor directly. They report
//! through [`SupervisorEvent`]s; the host delivers [`HostSignal`]s.

use crate::lifecycle::InstanceId;
use std::fmt;

/// Signals delivered to the service host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    /// (Re)deliver a start command; starts from the persisted configuration.
    Start,
    /// The notification's "Stop" action was pressed.
    StopAction,
    /// The host itself is being torn down (SIGTERM, SIGINT, shutdown).
    Terminate,
}

impl fmt::Display for HostSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostSignal::Start => write!(f, "start"),
            HostSignal::StopAction => write!(f, "stop_action"),
            HostSignal::Terminate => write!(f, "terminate"),
        }
    }
}

/// How a trace capture ended without being asked to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEnd {
    EndOfStream,
    Failed(String),
}

/// What a background task observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Watchdog saw the agent exit.
    AgentExited { code: Option<i32> },
    /// Watchdog's liveness probe failed; treated as not alive.
    ProbeFailed { error: String },
    /// Trace capture finished on its own.
    TraceEnded { end: TraceEnd, bytes: u64 },
}

/// Event reported by a background task for one agent instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorEvent {
    pub instance: InstanceId,
    pub kind: EventKind,
}

impl SupervisorEvent {
    pub fn new(instance: InstanceId, kind: EventKind) -> Self {
        Self { instance, kind }
    }

    /// Whether this event means the agent process is gone.
    pub fn is_exit(&self) -> bool {
        matches!(
            self.kind,
            EventKind::AgentExited { .. } | EventKind::ProbeFailed { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            EventKind::AgentExited { .. } => "agent:exited",
            EventKind::ProbeFailed { .. } => "agent:probe_failed",
            EventKind::TraceEnded { .. } => "trace:ended",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
