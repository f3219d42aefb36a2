// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op notification adapter.

use super::{NotifyAdapter, NotifyError, StatusNotification};
use async_trait::async_trait;

/// Notification adapter that silently discards all notifications.
///
/// Used on headless hosts where no notification server is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpNotifyAdapter;

impl NoOpNotifyAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotifyAdapter for NoOpNotifyAdapter {
    async fn show(&self, _notification: &StatusNotification) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn hide(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
