// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::process::{ProcessAdapter, ProcessError, SpawnedAgent};
use async_trait::async_trait;
use fdk_core::AgentConfig;
use tracing::Instrument;

/// Wrapper that adds tracing to any ProcessAdapter
#[derive(Clone)]
pub struct TracedProcess<P> {
    inner: P,
}

impl<P> TracedProcess<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: ProcessAdapter> ProcessAdapter for TracedProcess<P> {
    async fn spawn(&self, config: &AgentConfig) -> Result<SpawnedAgent, ProcessError> {
        let span = tracing::info_span!(
            "agent.spawn",
            command = config.command(),
            log_level = config.log_level()
        );
        async {
            tracing::info!(args = ?config.args(), "starting");
            let start = std::time::Instant::now();
            let result = self.inner.spawn(config).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(agent) => tracing::info!(pid = ?agent.handle.pid(), elapsed_ms, "agent spawned"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "spawn failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
