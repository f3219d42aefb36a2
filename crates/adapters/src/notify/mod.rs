// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification adapters

mod desktop;
mod noop;

pub use desktop::DesktopNotifyAdapter;
pub use noop::NoOpNotifyAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifyAdapter, NotifyCall};

use async_trait::async_trait;
use thiserror::Error;

/// Identifier of the single status notification and its stop action.
pub const APP_NAME: &str = "fdkeep";
pub const STOP_ACTION: &str = "stop";

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("channel registration failed: {0}")]
    ChannelFailed(String),
}

/// Named channel some platforms require before the first notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self {
            id: "fdk.agent".to_string(),
            name: "fdkeep".to_string(),
            description: "Backup agent status".to_string(),
        }
    }
}

/// The persistent status indicator: title, body, and one stop action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNotification {
    pub title: String,
    pub text: String,
    pub stop_label: String,
}

impl StatusNotification {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            title: APP_NAME.to_string(),
            text: text.into(),
            stop_label: "Stop".to_string(),
        }
    }
}

/// Adapter for the persistent status notification.
///
/// Implementations deliver the stop action as
/// [`HostSignal::StopAction`](fdk_core::HostSignal::StopAction) on the
/// channel they were built with.
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    /// Register the named channel. Callers invoke this once before the
    /// first `show`.
    async fn register_channel(&self, _channel: &NotificationChannel) -> Result<(), NotifyError> {
        Ok(())
    }

    /// Show (or replace) the persistent status notification
    async fn show(&self, notification: &StatusNotification) -> Result<(), NotifyError>;

    /// Remove the status notification
    async fn hide(&self) -> Result<(), NotifyError>;

    /// Whether showing the notification grants a keep-alive execution mode.
    ///
    /// Desktop Unix sessions have no such privilege, so the desktop and
    /// no-op adapters keep this default.
    fn foreground_capable(&self) -> bool {
        false
    }
}
