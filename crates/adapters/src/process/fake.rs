// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{AgentHandle, ProcessAdapter, ProcessControl, ProcessError, SpawnedAgent};
use async_trait::async_trait;
use fdk_core::{AgentConfig, Liveness};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::io::DuplexStream;

/// Buffer size of the in-memory pipe standing in for the agent's stdout
const PIPE_CAPACITY: usize = 64 * 1024;

/// Recorded spawn call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnCall {
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Default)]
struct FakeProcessStatus {
    exit: Option<Option<i32>>,
    terminated: bool,
    probe_error: Option<String>,
    probes: usize,
}

/// A fake agent process whose lifetime is driven by the test.
pub struct FakeProcess {
    pid: u32,
    status: Mutex<FakeProcessStatus>,
}

impl FakeProcess {
    fn new(pid: u32) -> Self {
        Self {
            pid,
            status: Mutex::new(FakeProcessStatus::default()),
        }
    }

    /// Simulate the process exiting on its own
    pub fn exit(&self, code: Option<i32>) {
        self.status.lock().exit = Some(code);
    }

    /// Make the next probes fail
    pub fn fail_probe(&self, error: &str) {
        self.status.lock().probe_error = Some(error.to_string());
    }

    pub fn is_terminated(&self) -> bool {
        self.status.lock().terminated
    }

    pub fn probe_count(&self) -> usize {
        self.status.lock().probes
    }
}

/// Shares the test's [`FakeProcess`] with the handle given to the supervisor.
struct SharedFake(Arc<FakeProcess>);

impl ProcessControl for SharedFake {
    fn pid(&self) -> Option<u32> {
        Some(self.0.pid)
    }

    fn probe(&self) -> Result<Liveness, ProcessError> {
        let mut status = self.0.status.lock();
        status.probes += 1;
        if let Some(ref error) = status.probe_error {
            return Err(ProcessError::ProbeFailed(error.clone()));
        }
        Ok(match status.exit {
            Some(code) => Liveness::Exited { code },
            None => Liveness::Running,
        })
    }

    fn terminate(&self) -> Result<(), ProcessError> {
        let mut status = self.0.status.lock();
        status.terminated = true;
        if status.exit.is_none() {
            // SIGTERM: no exit code
            status.exit = Some(None);
        }
        Ok(())
    }
}

struct FakeProcessState {
    calls: Vec<SpawnCall>,
    processes: Vec<Arc<FakeProcess>>,
    outputs: Vec<Option<DuplexStream>>,
    fail_spawn: Option<String>,
}

/// Fake process adapter for testing.
///
/// Each spawn creates an in-memory pipe: the supervisor reads one end as the
/// agent's stdout, the test takes the other end with [`take_output`] and
/// writes "agent output" into it.
///
/// [`take_output`]: FakeProcessAdapter::take_output
#[derive(Clone)]
pub struct FakeProcessAdapter {
    inner: Arc<Mutex<FakeProcessState>>,
}

impl Default for FakeProcessAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeProcessState {
                calls: Vec::new(),
                processes: Vec::new(),
                outputs: Vec::new(),
                fail_spawn: None,
            })),
        }
    }
}

impl FakeProcessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent spawns fail with the given message (`None` to clear)
    pub fn fail_spawn(&self, message: Option<&str>) {
        self.inner.lock().fail_spawn = message.map(str::to_string);
    }

    /// Get all recorded spawn calls
    pub fn calls(&self) -> Vec<SpawnCall> {
        self.inner.lock().calls.clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.inner.lock().processes.len()
    }

    /// The `index`-th spawned process
    pub fn process(&self, index: usize) -> Option<Arc<FakeProcess>> {
        self.inner.lock().processes.get(index).cloned()
    }

    /// Take the writer end of the `index`-th process's stdout
    pub fn take_output(&self, index: usize) -> Option<DuplexStream> {
        self.inner
            .lock()
            .outputs
            .get_mut(index)
            .and_then(Option::take)
    }
}

#[async_trait]
impl ProcessAdapter for FakeProcessAdapter {
    async fn spawn(&self, config: &AgentConfig) -> Result<SpawnedAgent, ProcessError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SpawnCall {
            command: config.command().to_string(),
            args: config.args(),
        });
        if let Some(ref message) = inner.fail_spawn {
            return Err(ProcessError::SpawnFailed {
                command: config.command().to_string(),
                message: message.clone(),
            });
        }

        let pid = 10_000 + inner.processes.len() as u32;
        let process = Arc::new(FakeProcess::new(pid));
        let (reader, writer) = tokio::io::duplex(PIPE_CAPACITY);
        inner.processes.push(Arc::clone(&process));
        inner.outputs.push(Some(writer));

        Ok(SpawnedAgent {
            handle: AgentHandle::new(SharedFake(process)),
            output: Box::new(reader),
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
