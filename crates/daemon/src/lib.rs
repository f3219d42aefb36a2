// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fdkeep daemon library
//!
//! Exposes the daemon's path layout and startup helpers for use by the CLI.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod lifecycle;

pub use lifecycle::{Config, DaemonHost, DaemonState, LifecycleError};
