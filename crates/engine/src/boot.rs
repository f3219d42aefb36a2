// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boot restart policy.
//!
//! After a device restart, re-establish the agent if it was last left
//! running. The decision is made from the persisted desired state alone.

use crate::error::SupervisorError;
use crate::supervisor::ProcessSupervisor;
use async_trait::async_trait;
use fdk_adapters::{NotifyAdapter, ProcessAdapter};
use fdk_core::AgentConfig;
use fdk_storage::{StateStore, StoreError};
use std::fmt;

/// Anything that can deliver a start command to the service.
///
/// Implemented in-process by [`ProcessSupervisor`] and by the CLI, which
/// launches the daemon instead.
#[async_trait]
pub trait ServiceStarter: Send {
    type Error: fmt::Display + Send;

    async fn start_service(&mut self, request: Option<AgentConfig>) -> Result<(), Self::Error>;
}

#[async_trait]
impl<P, N, S> ServiceStarter for ProcessSupervisor<P, N, S>
where
    P: ProcessAdapter,
    N: NotifyAdapter,
    S: StateStore,
{
    type Error = SupervisorError;

    async fn start_service(&mut self, request: Option<AgentConfig>) -> Result<(), SupervisorError> {
        self.start(request).await.map(|_| ())
    }
}

/// What the boot policy did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootDecision {
    /// Desired state said running; a start was issued and accepted
    Started,
    /// Desired state said not running
    Skipped,
    /// A start was issued but failed
    Failed(String),
}

pub struct BootRestartPolicy;

impl BootRestartPolicy {
    /// Issue exactly one start (without a request, so the persisted
    /// configuration is used) if the agent was last left running.
    ///
    /// Only a failure to read the store is returned as an error; a failed
    /// start is reported in the decision.
    pub async fn on_boot<S, T>(store: &S, starter: &mut T) -> Result<BootDecision, StoreError>
    where
        S: StateStore,
        T: ServiceStarter,
    {
        let desired = store.load()?;
        if !desired.running {
            tracing::info!("agent not marked running, nothing to restore on boot");
            return Ok(BootDecision::Skipped);
        }

        tracing::info!(command = ?desired.command, "restoring agent after boot");
        match starter.start_service(None).await {
            Ok(()) => Ok(BootDecision::Started),
            Err(e) => {
                tracing::error!(error = %e, "boot restart failed");
                Ok(BootDecision::Failed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
#[path = "boot_tests.rs"]
mod tests;
