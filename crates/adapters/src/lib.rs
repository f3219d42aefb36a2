// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the agent process and the status notification

pub mod notify;
pub mod process;
pub mod traced;

pub use notify::{
    DesktopNotifyAdapter, NoOpNotifyAdapter, NotificationChannel, NotifyAdapter, NotifyError,
    StatusNotification,
};
pub use process::{
    AgentHandle, AgentOutput, OsProcessAdapter, ProcessAdapter, ProcessControl, ProcessError,
    SpawnedAgent,
};
pub use traced::TracedProcess;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeProcess, FakeProcessAdapter, SpawnCall};
