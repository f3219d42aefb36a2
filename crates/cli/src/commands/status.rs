// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fdk status` - desired state and daemon liveness

use std::fmt::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use fdk_core::DesiredState;
use fdk_storage::StateStore;
use serde::Serialize;

use crate::client::{ClientError, DaemonControl};
use crate::output::{or_dash, print_json, OutputFormat};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonStatus {
    pub running: bool,
    pub pid: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub desired: DesiredState,
    pub daemon: DaemonStatus,
    pub updated_at: Option<DateTime<Utc>>,
}

pub fn collect(control: &DaemonControl) -> Result<StatusReport, ClientError> {
    let pid = control.running_pid();
    Ok(StatusReport {
        desired: control.store().load()?,
        daemon: DaemonStatus {
            running: pid.is_some(),
            pid,
        },
        updated_at: control.store().updated_at()?,
    })
}

pub fn format_text(report: &StatusReport) -> String {
    let mut out = String::new();
    let daemon = match report.daemon.pid {
        Some(pid) => format!("running (pid {pid})"),
        None => "not running".to_string(),
    };
    let desired = if report.desired.running {
        "running"
    } else {
        "stopped"
    };
    let updated = report
        .updated_at
        .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true));

    let _ = writeln!(out, "fdkd:     {daemon}");
    let _ = writeln!(out, "desired:  {desired}");
    let _ = writeln!(out, "command:  {}", or_dash(report.desired.command.as_deref()));
    let _ = writeln!(out, "trace:    {}", or_dash(report.desired.trace_path.as_deref()));
    let _ = writeln!(out, "level:    {}", or_dash(report.desired.log_level.as_deref()));
    let _ = writeln!(out, "updated:  {}", or_dash(updated.as_deref()));
    out
}

pub async fn handle(format: OutputFormat) -> Result<()> {
    let control = DaemonControl::load()?;
    let report = collect(&control)?;
    match format {
        OutputFormat::Text => print!("{}", format_text(&report)),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
