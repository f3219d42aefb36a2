// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use fdk_adapters::{NotifyAdapter, OsProcessAdapter, TracedProcess};
use fdk_engine::{ProcessSupervisor, ServiceHost};
use fdk_storage::{FileStateStore, StateStore, StoreError, NAMESPACE};
use fs2::FileExt;
use thiserror::Error;
use tracing::{info, warn};

use crate::env::state_dir;

/// Service host with the production process and store adapters
pub type DaemonHost<N> = ServiceHost<TracedProcess<OsProcessAdapter>, N, FileStateStore>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/fdk)
    pub state_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Trace file used when a start request does not name one
    pub default_trace_path: PathBuf,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        Ok(Self::at(state_dir()?))
    }

    /// Configuration rooted at an explicit state directory.
    pub fn at(state_dir: PathBuf) -> Self {
        Self {
            lock_path: state_dir.join("fdkd.pid"),
            log_path: state_dir.join("fdkd.log"),
            default_trace_path: state_dir.join("agent.trace"),
            state_dir,
        }
    }

    /// Desired-state store shared by the daemon and the CLI.
    pub fn store(&self) -> FileStateStore {
        FileStateStore::new(&self.state_dir, NAMESPACE)
    }

    /// PID recorded by a running daemon, if any.
    pub fn read_pid(&self) -> Option<u32> {
        std::fs::read_to_string(&self.lock_path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Daemon state during operation.
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub start_time: Instant,
}

/// Take the daemon lock and record our PID.
pub fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    // Open without truncating: the PID belongs to whoever holds the lock
    let mut lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    let desired = config.store().load()?;
    info!(
        running = desired.running,
        command = ?desired.command,
        trace = ?desired.trace_path,
        "desired state loaded"
    );

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        start_time: Instant::now(),
    })
}

impl DaemonState {
    /// Build the service host around the production adapters.
    pub fn build_host<N: NotifyAdapter>(&self, notifier: N) -> DaemonHost<N> {
        let (supervisor, events) = ProcessSupervisor::new(
            TracedProcess::new(OsProcessAdapter::new()),
            notifier,
            self.config.store(),
        );
        ServiceHost::new(supervisor, events)
    }

    /// Release the lock and remove the PID file.
    pub fn shutdown(self) {
        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }
        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
