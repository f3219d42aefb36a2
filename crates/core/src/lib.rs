// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fdk-core: Core types for the fdkeep agent supervisor

pub mod desired;
pub mod event;
pub mod lifecycle;

pub use desired::{AgentConfig, ConfigError, DesiredState, AGENT_FLAGS};
pub use event::{EventKind, HostSignal, SupervisorEvent, TraceEnd};
pub use lifecycle::{ExecutionMode, InstanceId, LifecycleState, Liveness};
