// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fdkeep supervision engine
//!
//! The [`ProcessSupervisor`] owns the agent process and coordinates its
//! [`TraceCapture`] and watchdog. The [`ServiceHost`] drives it from host
//! lifecycle callbacks and consumes background-task events.

pub mod boot;
pub mod env;
mod error;
mod host;
mod notification;
mod supervisor;
pub mod trace;
mod watchdog;

pub use boot::{BootDecision, BootRestartPolicy, ServiceStarter};
pub use error::SupervisorError;
pub use host::{HostDirective, ServiceHost};
pub use notification::{NotificationController, NotificationState, RUNNING_TEXT};
pub use supervisor::ProcessSupervisor;
pub use trace::{TraceCapture, TraceError, TraceOutcome, TraceReport};
pub use watchdog::spawn_watchdog;
