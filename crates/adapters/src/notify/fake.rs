// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notification adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{NotificationChannel, NotifyAdapter, NotifyError, StatusNotification};
use async_trait::async_trait;
use fdk_core::HostSignal;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Recorded notification call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyCall {
    RegisterChannel { id: String },
    Show { title: String, text: String },
    Hide,
}

struct FakeNotifyState {
    calls: Vec<NotifyCall>,
    visible: Option<StatusNotification>,
    actions: Option<mpsc::Sender<HostSignal>>,
    foreground: bool,
    fail_show: bool,
}

/// Fake notification adapter for testing
#[derive(Clone)]
pub struct FakeNotifyAdapter {
    inner: Arc<Mutex<FakeNotifyState>>,
}

impl Default for FakeNotifyAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeNotifyState {
                calls: Vec::new(),
                visible: None,
                actions: None,
                foreground: false,
                fail_show: false,
            })),
        }
    }
}

impl FakeNotifyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route the stop action to the given host signal channel
    pub fn with_actions(self, actions: mpsc::Sender<HostSignal>) -> Self {
        self.inner.lock().actions = Some(actions);
        self
    }

    /// Report the platform as granting a foreground execution mode
    pub fn with_foreground(self, foreground: bool) -> Self {
        self.inner.lock().foreground = foreground;
        self
    }

    /// Make subsequent `show` calls fail
    pub fn fail_show(&self, fail: bool) {
        self.inner.lock().fail_show = fail;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<NotifyCall> {
        self.inner.lock().calls.clone()
    }

    /// The notification currently on screen, if any
    pub fn visible(&self) -> Option<StatusNotification> {
        self.inner.lock().visible.clone()
    }

    /// Simulate the user pressing "Stop" on the visible notification.
    ///
    /// Returns `false` if nothing is shown or no action channel is wired.
    pub fn press_stop(&self) -> bool {
        let inner = self.inner.lock();
        if inner.visible.is_none() {
            return false;
        }
        match &inner.actions {
            Some(tx) => tx.try_send(HostSignal::StopAction).is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl NotifyAdapter for FakeNotifyAdapter {
    async fn register_channel(&self, channel: &NotificationChannel) -> Result<(), NotifyError> {
        self.inner.lock().calls.push(NotifyCall::RegisterChannel {
            id: channel.id.clone(),
        });
        Ok(())
    }

    async fn show(&self, notification: &StatusNotification) -> Result<(), NotifyError> {
        let mut inner = self.inner.lock();
        inner.calls.push(NotifyCall::Show {
            title: notification.title.clone(),
            text: notification.text.clone(),
        });
        if inner.fail_show {
            return Err(NotifyError::SendFailed("no notification server".to_string()));
        }
        inner.visible = Some(notification.clone());
        Ok(())
    }

    async fn hide(&self) -> Result<(), NotifyError> {
        let mut inner = self.inner.lock();
        inner.calls.push(NotifyCall::Hide);
        inner.visible = None;
        Ok(())
    }

    fn foreground_capable(&self) -> bool {
        self.inner.lock().foreground
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
