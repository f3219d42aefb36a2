// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent process adapters

mod os;

pub use os::OsProcessAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcess, FakeProcessAdapter, SpawnCall};

use async_trait::async_trait;
use fdk_core::{AgentConfig, Liveness};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Errors from process operations
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {command}: {message}")]
    SpawnFailed { command: String, message: String },
    #[error("liveness probe failed: {0}")]
    ProbeFailed(String),
    #[error("terminate failed: {0}")]
    TerminateFailed(String),
}

/// The agent's standard output stream.
pub type AgentOutput = Box<dyn AsyncRead + Send + Unpin>;

/// Control over one spawned OS process.
pub trait ProcessControl: Send + Sync + 'static {
    /// OS process id, if known
    fn pid(&self) -> Option<u32>;

    /// Non-blocking liveness probe. Never errors for a live process.
    fn probe(&self) -> Result<Liveness, ProcessError>;

    /// Request graceful termination
    fn terminate(&self) -> Result<(), ProcessError>;
}

/// Shared handle to a spawned agent process.
///
/// The supervisor holds the owning copy; background tasks get clones they
/// only probe through.
#[derive(Clone)]
pub struct AgentHandle {
    inner: Arc<dyn ProcessControl>,
}

impl AgentHandle {
    pub fn new(control: impl ProcessControl) -> Self {
        Self {
            inner: Arc::new(control),
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.inner.pid()
    }

    pub fn probe(&self) -> Result<Liveness, ProcessError> {
        self.inner.probe()
    }

    pub fn is_alive(&self) -> bool {
        self.probe().is_ok_and(|liveness| liveness.is_alive())
    }

    pub fn terminate(&self) -> Result<(), ProcessError> {
        self.inner.terminate()
    }
}

impl fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentHandle")
            .field("pid", &self.pid())
            .finish()
    }
}

/// A freshly spawned agent: its handle and its stdout.
pub struct SpawnedAgent {
    pub handle: AgentHandle,
    pub output: AgentOutput,
}

/// Adapter that launches the agent process.
#[async_trait]
pub trait ProcessAdapter: Clone + Send + Sync + 'static {
    /// Spawn `command -f -d <logLevel> -dt` with stdout piped.
    async fn spawn(&self, config: &AgentConfig) -> Result<SpawnedAgent, ProcessError>;
}
