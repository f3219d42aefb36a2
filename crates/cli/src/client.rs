// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon control for the CLI.
//!
//! The CLI never talks to the agent directly. It edits the shared desired
//! state and then drives `fdkd` with signals: SIGHUP re-delivers a start
//! command to a running daemon, SIGTERM stops it.

use crate::daemon_process::{
    force_kill_daemon, process_exists, read_startup_error, send_hangup, send_terminate,
    start_daemon_background, wait_for_exit,
};
use async_trait::async_trait;
use fdk_core::{AgentConfig, DesiredState};
use fdk_daemon::Config;
use fdk_engine::ServiceStarter;
use fdk_storage::{FileStateStore, StateStore, StoreError};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Timeout for the daemon to exit after SIGTERM
pub fn timeout_exit() -> Duration {
    crate::env::timeout_exit_ms().unwrap_or(Duration::from_secs(5))
}

/// Timeout for a launched daemon to record its PID
pub fn timeout_start() -> Duration {
    crate::env::timeout_start_ms().unwrap_or(Duration::from_secs(5))
}

/// Polling interval while waiting on the daemon
pub fn poll_interval() -> Duration {
    crate::env::poll_ms().unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("Timed out waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("Failed to signal daemon (pid {0})")]
    SignalFailed(u32),

    #[error("no agent configured; pass --command to set one")]
    NotConfigured,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine state directory")]
    NoStateDir,
}

/// How a start command reached the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A running daemon was asked to (re)start the agent
    Signalled(u32),
    /// A new daemon was launched
    Launched(u32),
}

/// How a stop request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    NotRunning,
    Stopped(u32),
    /// Daemon ignored SIGTERM and was killed
    Killed(u32),
}

/// Controls the daemon through its state directory.
pub struct DaemonControl {
    config: Config,
    store: FileStateStore,
}

impl DaemonControl {
    /// Control the daemon for the current user's state directory
    pub fn load() -> Result<Self, ClientError> {
        let config = Config::load().map_err(|_| ClientError::NoStateDir)?;
        Ok(Self::new(config))
    }

    pub fn new(config: Config) -> Self {
        let store = config.store();
        Self { config, store }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &FileStateStore {
        &self.store
    }

    /// PID of the running daemon. A PID file left by a dead daemon counts as
    /// not running.
    pub fn running_pid(&self) -> Option<u32> {
        self.config.read_pid().filter(|pid| process_exists(*pid))
    }

    /// Persist a start request as the desired state, or check that a
    /// previous one can be reused.
    pub fn prepare_start(&self, request: Option<&AgentConfig>) -> Result<(), ClientError> {
        match request {
            Some(config) => self.store.save(&DesiredState::running_with(config))?,
            None => {
                if self.store.load()?.config().is_none() {
                    return Err(ClientError::NotConfigured);
                }
            }
        }
        Ok(())
    }

    /// Deliver a start command: signal a running daemon, or launch one.
    pub async fn deliver_start(&self) -> Result<StartOutcome, ClientError> {
        if let Some(pid) = self.running_pid() {
            if !send_hangup(pid) {
                return Err(ClientError::SignalFailed(pid));
            }
            return Ok(StartOutcome::Signalled(pid));
        }

        let mut child = start_daemon_background()?;
        let started = Instant::now();
        while started.elapsed() < timeout_start() {
            if let Some(pid) = self.config.read_pid() {
                if pid == child.id() {
                    return Ok(StartOutcome::Launched(pid));
                }
            }
            if let Some(status) = child.try_wait()? {
                let reason = read_startup_error(&self.config.log_path)
                    .unwrap_or_else(|| format!("fdkd exited with {status}"));
                return Err(ClientError::DaemonStartFailed(reason));
            }
            tokio::time::sleep(poll_interval()).await;
        }
        Err(ClientError::DaemonStartTimeout)
    }

    /// Persist `running = false` and stop the daemon.
    pub async fn stop(&self) -> Result<StopOutcome, ClientError> {
        if self.config.state_dir.exists() {
            self.store.set_running(false)?;
        }

        let Some(pid) = self.running_pid() else {
            return Ok(StopOutcome::NotRunning);
        };
        if !send_terminate(pid) {
            return Err(ClientError::SignalFailed(pid));
        }
        if wait_for_exit(pid, timeout_exit()).await {
            return Ok(StopOutcome::Stopped(pid));
        }

        force_kill_daemon(pid);
        wait_for_exit(pid, timeout_exit()).await;
        Ok(StopOutcome::Killed(pid))
    }
}

/// Starts the service by launching or signalling `fdkd`.
pub struct DaemonLauncher {
    control: DaemonControl,
    last: Option<StartOutcome>,
}

impl DaemonLauncher {
    pub fn new(control: DaemonControl) -> Self {
        Self {
            control,
            last: None,
        }
    }

    pub fn last_outcome(&self) -> Option<StartOutcome> {
        self.last
    }
}

#[async_trait]
impl ServiceStarter for DaemonLauncher {
    type Error = ClientError;

    async fn start_service(&mut self, request: Option<AgentConfig>) -> Result<(), ClientError> {
        self.control.prepare_start(request.as_ref())?;
        self.last = Some(self.control.deliver_start().await?);
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
