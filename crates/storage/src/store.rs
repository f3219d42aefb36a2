// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desired-state store abstraction.

use fdk_core::DesiredState;
use std::sync::Arc;
use thiserror::Error;

/// Fixed namespace shared by the supervisor and the boot restart policy.
pub const NAMESPACE: &str = "fdk.agent";

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Durable key-value storage over the [`DesiredState`] schema.
///
/// Writes must be committed before they return. There is no locking between
/// concurrent writers; the last write wins.
pub trait StateStore: Send + Sync + 'static {
    /// Read the persisted state. A store with nothing written yet returns
    /// the default (not running, no configuration).
    fn load(&self) -> Result<DesiredState, StoreError>;

    /// Replace the persisted state.
    fn save(&self, state: &DesiredState) -> Result<(), StoreError>;

    /// Update only the `running` flag, keeping the last configuration.
    fn set_running(&self, running: bool) -> Result<(), StoreError> {
        let mut state = self.load()?;
        state.running = running;
        self.save(&state)
    }
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn load(&self) -> Result<DesiredState, StoreError> {
        (**self).load()
    }

    fn save(&self, state: &DesiredState) -> Result<(), StoreError> {
        (**self).save(state)
    }

    fn set_running(&self, running: bool) -> Result<(), StoreError> {
        (**self).set_running(running)
    }
}
