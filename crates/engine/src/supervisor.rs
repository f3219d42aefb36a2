// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process supervisor: the single owner of the agent process.
//!
//! The supervisor is driven from one control task. Background work (trace
//! capture, watchdog) runs in its own tasks and reports back through the
//! event channel returned by [`ProcessSupervisor::new`]; the owner of that
//! receiver feeds events into [`ProcessSupervisor::handle_event`].

use crate::env;
use crate::error::SupervisorError;
use crate::notification::{NotificationController, NotificationState, RUNNING_TEXT};
use crate::trace::{TraceCapture, TraceOutcome};
use crate::watchdog::spawn_watchdog;
use fdk_adapters::{AgentHandle, NotifyAdapter, ProcessAdapter};
use fdk_core::{
    AgentConfig, DesiredState, EventKind, InstanceId, LifecycleState, SupervisorEvent, TraceEnd,
};
use fdk_storage::StateStore;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Capacity of the background event channel
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// The agent instance currently held by the supervisor
struct AgentInstance {
    id: InstanceId,
    handle: AgentHandle,
    config: AgentConfig,
    started_at: Instant,
}

pub struct ProcessSupervisor<P, N, S> {
    processes: P,
    notifications: NotificationController<N>,
    store: S,
    events: mpsc::Sender<SupervisorEvent>,
    current: Option<AgentInstance>,
    capture: Option<(InstanceId, TraceCapture)>,
    last_instance: InstanceId,
    watchdog_interval: Duration,
}

impl<P, N, S> ProcessSupervisor<P, N, S>
where
    P: ProcessAdapter,
    N: NotifyAdapter,
    S: StateStore,
{
    /// Create a supervisor and the receiving end of its event channel.
    pub fn new(processes: P, notifier: N, store: S) -> (Self, mpsc::Receiver<SupervisorEvent>) {
        let (events, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let supervisor = Self {
            processes,
            notifications: NotificationController::new(notifier),
            store,
            events,
            current: None,
            capture: None,
            last_instance: InstanceId::new(0),
            watchdog_interval: env::watchdog_poll_ms(),
        };
        (supervisor, rx)
    }

    /// Override the watchdog poll interval
    pub fn with_watchdog_interval(mut self, interval: Duration) -> Self {
        self.watchdog_interval = interval;
        self
    }

    /// Start the agent.
    ///
    /// With a request, the request is persisted as the desired state before
    /// anything else; a failed write aborts the start. Without one, the last
    /// persisted configuration is used. Returns `Running` without spawning
    /// if an agent is already held.
    pub async fn start(
        &mut self,
        request: Option<AgentConfig>,
    ) -> Result<LifecycleState, SupervisorError> {
        let config = match request {
            Some(config) => {
                self.store.save(&DesiredState::running_with(&config))?;
                config
            }
            None => {
                let desired = self.store.load()?;
                let config = desired.config().ok_or(SupervisorError::NotConfigured)?;
                if !desired.running {
                    self.store.set_running(true)?;
                }
                config
            }
        };

        if let Some(agent) = &self.current {
            debug!(instance = %agent.id, "agent already running, ignoring start");
            return Ok(LifecycleState::Running);
        }

        // Capture left over from an instance that exited on its own
        self.finish_capture().await;

        let spawned = match self.processes.spawn(&config).await {
            Ok(spawned) => spawned,
            Err(e) => {
                error!(command = config.command(), error = %e, "failed to start agent");
                return Err(e.into());
            }
        };

        let id = self.last_instance.next();
        self.last_instance = id;

        let capture = TraceCapture::spawn(
            spawned.output,
            config.trace_file(),
            id,
            self.events.clone(),
        );
        self.capture = Some((id, capture));

        spawn_watchdog(
            spawned.handle.clone(),
            id,
            self.watchdog_interval,
            self.events.clone(),
        );

        let mode = self.notifications.execution_mode();
        info!(
            instance = %id,
            pid = ?spawned.handle.pid(),
            trace = config.trace_path(),
            mode = %mode,
            "agent started"
        );

        self.current = Some(AgentInstance {
            id,
            handle: spawned.handle,
            config,
            started_at: Instant::now(),
        });
        self.notifications.show_running(RUNNING_TEXT).await;

        Ok(LifecycleState::Running)
    }

    /// Stop the agent.
    ///
    /// Teardown always runs to completion. When this returns, the trace
    /// capture has exited and its file is closed. A failure to persist
    /// `running = false` is returned after teardown.
    pub async fn stop(&mut self) -> Result<(), SupervisorError> {
        let persisted = self.store.set_running(false);
        if let Err(e) = &persisted {
            error!(error = %e, "failed to persist stop");
        }

        self.notifications.hide().await;

        if let Some(agent) = self.current.take() {
            let was_alive = agent.handle.is_alive();
            if let Err(e) = agent.handle.terminate() {
                warn!(instance = %agent.id, error = %e, "failed to terminate agent");
            }
            info!(
                instance = %agent.id,
                pid = ?agent.handle.pid(),
                was_alive,
                uptime_ms = agent.started_at.elapsed().as_millis() as u64,
                "agent stopped"
            );
        }

        self.finish_capture().await;

        persisted.map_err(SupervisorError::from)
    }

    /// Apply an event reported by a background task.
    pub fn handle_event(&mut self, event: SupervisorEvent) {
        match event.kind {
            EventKind::AgentExited { .. } | EventKind::ProbeFailed { .. } => {
                let is_current = self
                    .current
                    .as_ref()
                    .is_some_and(|agent| agent.id == event.instance);
                if !is_current {
                    debug!(instance = %event.instance, event = event.name(), "ignoring stale event");
                    return;
                }
                if let Some(agent) = self.current.take() {
                    info!(
                        instance = %agent.id,
                        command = agent.config.command(),
                        uptime_ms = agent.started_at.elapsed().as_millis() as u64,
                        "agent handle released"
                    );
                }
            }
            EventKind::TraceEnded { end, bytes } => match end {
                TraceEnd::EndOfStream => {
                    info!(instance = %event.instance, bytes, "agent closed its output");
                }
                TraceEnd::Failed(error) => {
                    warn!(instance = %event.instance, bytes, error = %error, "trace capture failed");
                }
            },
        }
    }

    pub fn state(&self) -> LifecycleState {
        if self.current.is_some() {
            LifecycleState::Running
        } else {
            LifecycleState::Stopped
        }
    }

    pub fn handle(&self) -> Option<&AgentHandle> {
        self.current.as_ref().map(|agent| &agent.handle)
    }

    pub fn instance(&self) -> Option<InstanceId> {
        self.current.as_ref().map(|agent| agent.id)
    }

    pub fn notification(&self) -> &NotificationState {
        self.notifications.state()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn finish_capture(&mut self) {
        let Some((instance, capture)) = self.capture.take() else {
            return;
        };
        let path = capture.path().to_path_buf();
        let report = capture.stop().await;
        match report.outcome {
            TraceOutcome::Failed(e) => {
                warn!(%instance, path = %path.display(), bytes = report.bytes, error = %e, "trace capture ended with error");
            }
            outcome => debug!(%instance, path = %path.display(), bytes = report.bytes, ?outcome, "trace capture joined"),
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
