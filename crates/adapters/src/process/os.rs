// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real OS process adapter.

use super::{AgentHandle, ProcessAdapter, ProcessControl, ProcessError, SpawnedAgent};
use async_trait::async_trait;
use fdk_core::{AgentConfig, Liveness};
use parking_lot::Mutex;
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Spawns the agent as a child process. Only stdout is captured; stderr is
/// inherited from the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsProcessAdapter;

impl OsProcessAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessAdapter for OsProcessAdapter {
    async fn spawn(&self, config: &AgentConfig) -> Result<SpawnedAgent, ProcessError> {
        let spawn_failed = |message: String| ProcessError::SpawnFailed {
            command: config.command().to_string(),
            message,
        };

        let mut child = Command::new(config.command())
            .args(config.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| spawn_failed(e.to_string()))?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.start_kill();
            return Err(spawn_failed("stdout was not captured".to_string()));
        };

        let pid = child.id();
        Ok(SpawnedAgent {
            handle: AgentHandle::new(OsProcess {
                pid,
                child: Mutex::new(child),
            }),
            output: Box::new(stdout),
        })
    }
}

struct OsProcess {
    pid: Option<u32>,
    child: Mutex<Child>,
}

impl ProcessControl for OsProcess {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn probe(&self) -> Result<Liveness, ProcessError> {
        // try_wait also reaps the child once it has exited
        match self.child.lock().try_wait() {
            Ok(None) => Ok(Liveness::Running),
            Ok(Some(status)) => Ok(Liveness::Exited {
                code: status.code(),
            }),
            Err(e) => Err(ProcessError::ProbeFailed(e.to_string())),
        }
    }

    fn terminate(&self) -> Result<(), ProcessError> {
        if !self.probe().is_ok_and(|liveness| liveness.is_alive()) {
            return Ok(());
        }
        if let Some(pid) = self.pid {
            if sigterm(pid) {
                return Ok(());
            }
            tracing::warn!(pid, "SIGTERM failed, killing agent");
        }
        self.child
            .lock()
            .start_kill()
            .map_err(|e| ProcessError::TerminateFailed(e.to_string()))
    }
}

/// Send SIGTERM via `kill`
fn sigterm(pid: u32) -> bool {
    std::process::Command::new("kill")
        .args(["-15", &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "os_tests.rs"]
mod tests;
