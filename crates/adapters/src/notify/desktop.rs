// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop notification adapter using notify-rust.
//!
//! On XDG desktops the status notification is resident, never expires, and
//! carries a "Stop" action. A dedicated thread waits for the action and
//! forwards it as `HostSignal::StopAction`; the thread ends when the
//! notification is closed. Hiding replaces the notification by id and closes
//! the replacement, which also releases the waiting thread.
//!
//! On macOS, `notify-rust` uses `mac-notification-sys`, whose first
//! notification runs an AppleScript bundle lookup that blocks forever in a
//! daemon without Automation permissions. Channel registration pre-sets the
//! bundle identifier so that lookup never happens. Actions are unsupported
//! there; the notification is informational only.

use super::{NotificationChannel, NotifyAdapter, NotifyError, StatusNotification};
use async_trait::async_trait;
use fdk_core::HostSignal;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct DesktopNotifyAdapter {
    actions: mpsc::Sender<HostSignal>,
    /// Id of the notification currently on screen
    shown: Arc<Mutex<Option<u32>>>,
}

impl DesktopNotifyAdapter {
    pub fn new(actions: mpsc::Sender<HostSignal>) -> Self {
        Self {
            actions,
            shown: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn register_channel(&self, channel: &NotificationChannel) -> Result<(), NotifyError> {
        #[cfg(target_os = "macos")]
        {
            mac_notification_sys::set_application("com.apple.Terminal")
                .map_err(|e| NotifyError::ChannelFailed(e.to_string()))?;
        }
        tracing::debug!(channel = %channel.id, name = %channel.name, "notification channel registered");
        Ok(())
    }

    async fn show(&self, notification: &StatusNotification) -> Result<(), NotifyError> {
        let notification = notification.clone();
        let actions = self.actions.clone();
        let shown = Arc::clone(&self.shown);
        // notify_rust::Notification::show() is synchronous; keep it off the
        // async runtime.
        tokio::task::spawn_blocking(move || show_blocking(&notification, &shown, actions))
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?
    }

    async fn hide(&self) -> Result<(), NotifyError> {
        let Some(id) = self.shown.lock().take() else {
            return Ok(());
        };
        tokio::task::spawn_blocking(move || close_blocking(id))
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))?
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn show_blocking(
    status: &StatusNotification,
    shown: &Mutex<Option<u32>>,
    actions: mpsc::Sender<HostSignal>,
) -> Result<(), NotifyError> {
    use notify_rust::{Hint, Notification, Timeout};

    let previous = *shown.lock();
    let mut notification = Notification::new();
    notification
        .appname(super::APP_NAME)
        .summary(&status.title)
        .body(&status.text)
        .action(super::STOP_ACTION, &status.stop_label)
        .hint(Hint::Resident(true))
        .timeout(Timeout::Never);
    if let Some(id) = previous {
        notification.id(id);
    }

    tracing::info!(title = %status.title, text = %status.text, "showing status notification");
    let handle = notification
        .show()
        .map_err(|e| NotifyError::SendFailed(e.to_string()))?;
    *shown.lock() = Some(handle.id());

    // Replaced in place: the listener for this id is still waiting
    if previous == Some(handle.id()) {
        return Ok(());
    }

    let spawned = std::thread::Builder::new()
        .name("fdk-notify-action".to_string())
        .spawn(move || {
            handle.wait_for_action(|action| {
                if action == super::STOP_ACTION {
                    tracing::info!("stop action invoked from notification");
                    if actions.blocking_send(HostSignal::StopAction).is_err() {
                        tracing::warn!("host is gone, stop action dropped");
                    }
                }
            });
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "failed to spawn notification action listener");
    }
    Ok(())
}

#[cfg(all(unix, not(target_os = "macos")))]
fn close_blocking(id: u32) -> Result<(), NotifyError> {
    use notify_rust::Notification;

    let handle = Notification::new()
        .appname(super::APP_NAME)
        .id(id)
        .summary(super::APP_NAME)
        .show()
        .map_err(|e| NotifyError::SendFailed(e.to_string()))?;
    handle.close();
    tracing::info!(id, "status notification removed");
    Ok(())
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn show_blocking(
    status: &StatusNotification,
    shown: &Mutex<Option<u32>>,
    _actions: mpsc::Sender<HostSignal>,
) -> Result<(), NotifyError> {
    tracing::info!(title = %status.title, text = %status.text, "showing status notification");
    notify_rust::Notification::new()
        .summary(&status.title)
        .body(&status.text)
        .show()
        .map(|_| ())
        .map_err(|e| NotifyError::SendFailed(e.to_string()))?;
    *shown.lock() = Some(0);
    Ok(())
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn close_blocking(_id: u32) -> Result<(), NotifyError> {
    // Informational notifications expire on their own here.
    Ok(())
}
