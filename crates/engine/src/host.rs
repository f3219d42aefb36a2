// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service host: maps host lifecycle callbacks onto the supervisor.

use crate::error::SupervisorError;
use crate::supervisor::ProcessSupervisor;
use fdk_adapters::{NotifyAdapter, ProcessAdapter};
use fdk_core::{HostSignal, SupervisorEvent};
use fdk_storage::StateStore;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// What the host should do after handling a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostDirective {
    Continue,
    Shutdown,
}

pub struct ServiceHost<P, N, S> {
    supervisor: ProcessSupervisor<P, N, S>,
    events: mpsc::Receiver<SupervisorEvent>,
    created: bool,
}

impl<P, N, S> ServiceHost<P, N, S>
where
    P: ProcessAdapter,
    N: NotifyAdapter,
    S: StateStore,
{
    pub fn new(
        supervisor: ProcessSupervisor<P, N, S>,
        events: mpsc::Receiver<SupervisorEvent>,
    ) -> Self {
        Self {
            supervisor,
            events,
            created: false,
        }
    }

    pub fn supervisor(&self) -> &ProcessSupervisor<P, N, S> {
        &self.supervisor
    }

    pub fn on_create(&mut self) {
        if self.created {
            return;
        }
        self.created = true;
        info!("service host created");
    }

    /// Handle a start command delivered by the host.
    ///
    /// Start failures are logged and the host keeps running.
    pub async fn on_start_command(&mut self, signal: HostSignal) -> HostDirective {
        info!(%signal, "host signal received");
        match signal {
            HostSignal::Start => {
                if let Err(e) = self.supervisor.start(None).await {
                    error!(error = %e, "start command failed");
                }
                HostDirective::Continue
            }
            HostSignal::StopAction | HostSignal::Terminate => HostDirective::Shutdown,
        }
    }

    /// Tear down unconditionally.
    pub async fn on_destroy(&mut self) -> Result<(), SupervisorError> {
        info!("service host destroyed, stopping agent");
        let result = self.supervisor.stop().await;
        if let Err(e) = &result {
            error!(error = %e, "stop during teardown incomplete");
        }
        result
    }

    /// Supervising loop.
    ///
    /// Consumes host signals and background events until a signal asks for
    /// shutdown or the signal channel closes, then tears down.
    pub async fn run(
        &mut self,
        mut signals: mpsc::Receiver<HostSignal>,
    ) -> Result<(), SupervisorError> {
        self.on_create();

        loop {
            tokio::select! {
                signal = signals.recv() => {
                    let Some(signal) = signal else {
                        info!("signal channel closed");
                        break;
                    };
                    if self.on_start_command(signal).await == HostDirective::Shutdown {
                        break;
                    }
                }
                Some(event) = self.events.recv() => {
                    debug!(event = event.name(), instance = %event.instance, "supervisor event");
                    self.supervisor.handle_event(event);
                }
            }
        }

        self.on_destroy().await
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
