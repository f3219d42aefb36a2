// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desired agent state.
//!
//! `DesiredState` is the persisted intent: which agent binary to run, where
//! its trace goes, at what log level, and whether it should be running at
//! all. It is independent of whether an agent process actually exists.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Flags passed to every agent invocation, in order, before the log level.
///
/// The full contract is `command -f -d <logLevel> -dt`: foreground mode,
/// debug level, then timestamped trace output.
pub const AGENT_FLAGS: [&str; 2] = ["-f", "-d"];

/// Trailing flag enabling timestamps in the agent's trace output.
const TIMESTAMP_FLAG: &str = "-dt";

/// Errors building an [`AgentConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Persisted desired state for the agent.
///
/// Field names on disk follow the external schema (`tracePath`, `logLevel`)
/// shared with the boot restart policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredState {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub trace_path: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub running: bool,
}

impl DesiredState {
    /// Desired state recorded by a successful `start()` request.
    pub fn running_with(config: &AgentConfig) -> Self {
        Self {
            command: Some(config.command().to_string()),
            trace_path: Some(config.trace_path().to_string()),
            log_level: Some(config.log_level().to_string()),
            running: true,
        }
    }

    /// Rebuild the last persisted agent configuration.
    ///
    /// Returns `None` if any of the three fields is missing or empty.
    pub fn config(&self) -> Option<AgentConfig> {
        AgentConfig::new(
            self.command.as_deref()?,
            self.trace_path.as_deref()?,
            self.log_level.as_deref()?,
        )
        .ok()
    }
}

/// A validated agent configuration: all three fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    command: String,
    trace_path: String,
    log_level: String,
}

impl AgentConfig {
    pub fn new(
        command: impl Into<String>,
        trace_path: impl Into<String>,
        log_level: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let command = non_empty("command", command.into())?;
        let trace_path = non_empty("trace path", trace_path.into())?;
        let log_level = non_empty("log level", log_level.into())?;
        Ok(Self {
            command,
            trace_path,
            log_level,
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn trace_path(&self) -> &str {
        &self.trace_path
    }

    pub fn trace_file(&self) -> PathBuf {
        PathBuf::from(&self.trace_path)
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Arguments for the agent process (excluding the program itself).
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = AGENT_FLAGS.iter().map(|s| s.to_string()).collect();
        args.push(self.log_level.clone());
        args.push(TIMESTAMP_FLAG.to_string());
        args
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty(field));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "desired_tests.rs"]
mod tests;
