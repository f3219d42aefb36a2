// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status notification control surface.

use fdk_adapters::{NotificationChannel, NotifyAdapter, StatusNotification};
use fdk_core::ExecutionMode;

/// Text shown while the agent is running
pub const RUNNING_TEXT: &str = "File Daemon is Running";

/// What the user currently sees
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    pub visible: bool,
    pub text: String,
}

/// Shows and hides the persistent status notification.
///
/// Registers the notification channel once, before the first show. Failures
/// are logged and never propagate: the notification is not allowed to break
/// start or stop.
pub struct NotificationController<N> {
    adapter: N,
    channel: NotificationChannel,
    channel_registered: bool,
    state: NotificationState,
}

impl<N: NotifyAdapter> NotificationController<N> {
    pub fn new(adapter: N) -> Self {
        Self {
            adapter,
            channel: NotificationChannel::default(),
            channel_registered: false,
            state: NotificationState::default(),
        }
    }

    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    /// Execution mode the platform grants while the notification is shown.
    pub fn execution_mode(&self) -> ExecutionMode {
        if self.adapter.foreground_capable() {
            ExecutionMode::Foreground
        } else {
            ExecutionMode::Background
        }
    }

    /// Show the running notification. Already showing `text` is a no-op.
    pub async fn show_running(&mut self, text: &str) {
        if self.state.visible && self.state.text == text {
            tracing::debug!("status notification already shown");
            return;
        }

        if !self.channel_registered {
            match self.adapter.register_channel(&self.channel).await {
                Ok(()) => self.channel_registered = true,
                Err(e) => {
                    tracing::warn!(channel = %self.channel.id, error = %e, "notification channel registration failed");
                }
            }
        }

        match self.adapter.show(&StatusNotification::new(text)).await {
            Ok(()) => {
                self.state = NotificationState {
                    visible: true,
                    text: text.to_string(),
                };
            }
            Err(e) => tracing::warn!(error = %e, "failed to show status notification"),
        }
    }

    /// Remove the notification if it is shown.
    pub async fn hide(&mut self) {
        if !self.state.visible {
            return;
        }
        if let Err(e) = self.adapter.hide().await {
            tracing::warn!(error = %e, "failed to hide status notification");
        }
        self.state = NotificationState::default();
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
