// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory desired-state store.
//!
//! Drop-in replacement for [`FileStateStore`](crate::FileStateStore) in tests.
//! Clones share the same state, so a test can keep one handle while the
//! supervisor owns another.

use crate::store::{StateStore, StoreError};
use fdk_core::DesiredState;
use parking_lot::Mutex;
use std::sync::Arc;

struct MemoryState {
    state: DesiredState,
    writes: Vec<DesiredState>,
    fail_writes: bool,
}

#[derive(Clone)]
pub struct MemoryStateStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::with_state(DesiredState::default())
    }
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: DesiredState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryState {
                state,
                writes: Vec::new(),
                fail_writes: false,
            })),
        }
    }

    /// Current state without going through the trait.
    pub fn snapshot(&self) -> DesiredState {
        self.inner.lock().state.clone()
    }

    /// Every committed write, oldest first.
    pub fn writes(&self) -> Vec<DesiredState> {
        self.inner.lock().writes.clone()
    }

    /// Make subsequent writes fail (reads keep working).
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<DesiredState, StoreError> {
        Ok(self.inner.lock().state.clone())
    }

    fn save(&self, state: &DesiredState) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.fail_writes {
            return Err(StoreError::Rejected("writes disabled".to_string()));
        }
        inner.state = state.clone();
        inner.writes.push(state.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
