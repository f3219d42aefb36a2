// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent liveness watchdog.
//!
//! Polls the agent at a fixed interval and reports its exit. It observes
//! only: it holds no store and takes no corrective action. There is no
//! cancellation; the task ends once it sees the process gone.

use fdk_adapters::AgentHandle;
use fdk_core::{EventKind, InstanceId, Liveness, SupervisorEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn a watchdog for one agent instance.
pub fn spawn_watchdog(
    handle: AgentHandle,
    instance: InstanceId,
    interval: Duration,
    events: mpsc::Sender<SupervisorEvent>,
) -> JoinHandle<()> {
    tokio::spawn(watch(handle, instance, interval, events))
}

async fn watch(
    handle: AgentHandle,
    instance: InstanceId,
    interval: Duration,
    events: mpsc::Sender<SupervisorEvent>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let kind = loop {
        ticker.tick().await;
        tracing::trace!(%instance, "checking agent process");
        match handle.probe() {
            Ok(Liveness::Running) => continue,
            Ok(Liveness::Exited { code }) => {
                tracing::warn!(%instance, pid = ?handle.pid(), exit_code = ?code, "agent stopped");
                break EventKind::AgentExited { code };
            }
            Err(e) => {
                tracing::error!(%instance, error = %e, "watchdog probe failed, treating agent as gone");
                break EventKind::ProbeFailed {
                    error: e.to_string(),
                };
            }
        }
    };

    if events
        .send(SupervisorEvent::new(instance, kind))
        .await
        .is_err()
    {
        tracing::debug!(%instance, "supervisor gone, exit not delivered");
    }
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
