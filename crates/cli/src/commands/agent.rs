// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fdk start`, `fdk stop`, `fdk boot` - agent lifecycle commands

use crate::client::{DaemonControl, DaemonLauncher, StartOutcome, StopOutcome};
use anyhow::{bail, Result};
use clap::Args;
use fdk_core::{AgentConfig, ConfigError};
use fdk_daemon::Config;
use fdk_engine::{BootDecision, BootRestartPolicy, ServiceStarter};
use std::path::PathBuf;

/// Log level passed to the agent when none is given
pub const DEFAULT_LOG_LEVEL: &str = "100";

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Agent executable; replaces the persisted configuration
    #[arg(long)]
    pub command: Option<String>,

    /// Trace file (default: <state_dir>/agent.trace)
    #[arg(long, requires = "command")]
    pub trace: Option<PathBuf>,

    /// Agent log level (default: 100)
    #[arg(long, requires = "command")]
    pub level: Option<String>,
}

/// Build the start request, if the arguments carry one.
///
/// Without `--command` the daemon falls back to the persisted configuration.
pub fn build_request(args: &StartArgs, config: &Config) -> Result<Option<AgentConfig>, ConfigError> {
    let Some(command) = &args.command else {
        return Ok(None);
    };
    let trace = args
        .trace
        .clone()
        .unwrap_or_else(|| config.default_trace_path.clone());
    let level = args.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
    AgentConfig::new(command.as_str(), trace.to_string_lossy(), level).map(Some)
}

pub async fn start(args: StartArgs) -> Result<()> {
    let control = DaemonControl::load()?;
    let request = build_request(&args, control.config())?;

    let mut launcher = DaemonLauncher::new(control);
    launcher.start_service(request).await?;
    print_start_outcome(launcher.last_outcome());
    Ok(())
}

pub async fn stop() -> Result<()> {
    let control = DaemonControl::load()?;
    match control.stop().await? {
        StopOutcome::NotRunning => println!("fdkd not running"),
        StopOutcome::Stopped(pid) => println!("fdkd stopped (pid {pid})"),
        StopOutcome::Killed(pid) => println!("fdkd did not exit in time, killed (pid {pid})"),
    }
    Ok(())
}

pub async fn boot() -> Result<()> {
    let control = DaemonControl::load()?;
    let store = control.config().store();
    let mut launcher = DaemonLauncher::new(control);

    match BootRestartPolicy::on_boot(&store, &mut launcher).await? {
        BootDecision::Started => print_start_outcome(launcher.last_outcome()),
        BootDecision::Skipped => println!("Agent not marked running, nothing to restore"),
        BootDecision::Failed(reason) => bail!("boot restart failed: {reason}"),
    }
    Ok(())
}

fn print_start_outcome(outcome: Option<StartOutcome>) {
    match outcome {
        Some(StartOutcome::Signalled(pid)) => println!("Start command delivered to fdkd (pid {pid})"),
        Some(StartOutcome::Launched(pid)) => println!("fdkd started (pid {pid})"),
        None => {}
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
