// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fdkeep daemon (fdkd)
//!
//! Host service that keeps the backup agent running.
//!
//! Architecture:
//! - Signal task: maps Unix signals onto host signals
//! - Host loop: main task driving the supervisor from host signals and
//!   background events

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use fdk_adapters::{DesktopNotifyAdapter, NoOpNotifyAdapter};
use fdk_core::HostSignal;
use fdk_daemon::env;
use fdk_daemon::lifecycle::{self, Config, LifecycleError};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Pending host signals (start commands, stop action, termination)
const SIGNAL_CHANNEL_CAPACITY: usize = 16;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle info flags before any config/lock acquisition
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("fdkd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("fdkd {}", env!("CARGO_PKG_VERSION"));
                println!("fdkeep daemon - keeps the backup agent running in the background");
                println!();
                println!("USAGE:");
                println!("    fdkd");
                println!();
                println!("The daemon is typically started by the `fdk` CLI and should not");
                println!("be invoked directly. SIGHUP re-delivers a start command; SIGTERM");
                println!("stops the agent and exits.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: fdkd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;

    // Write startup marker to log (before tracing setup, so CLI can find it)
    write_startup_marker(&config)?;

    let log_guard = setup_logging(&config)?;

    info!("Starting fdkd");

    let daemon = match lifecycle::startup(&config) {
        Ok(daemon) => daemon,
        Err(LifecycleError::LockFailed(_)) => {
            eprintln!("fdkd is already running");
            if let Some(pid) = config.read_pid() {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            // Write error synchronously (tracing is non-blocking and may not flush in time)
            write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let (signal_tx, signal_rx) = mpsc::channel(SIGNAL_CHANNEL_CAPACITY);
    spawn_signal_forwarder(signal_tx.clone())?;

    // The host was launched to run the agent: deliver the first start command
    signal_tx.send(HostSignal::Start).await?;

    let result = if env::notifications_disabled() {
        info!("desktop notifications disabled");
        let mut host = daemon.build_host(NoOpNotifyAdapter::new());
        host.run(signal_rx).await
    } else {
        let mut host = daemon.build_host(DesktopNotifyAdapter::new(signal_tx));
        host.run(signal_rx).await
    };
    if let Err(e) = result {
        error!(error = %e, "agent teardown reported an error");
    }

    daemon.shutdown();
    info!("Daemon stopped");
    Ok(())
}

/// Forward Unix signals to the host loop.
///
/// SIGHUP re-delivers a start command; SIGTERM and SIGINT terminate the host.
fn spawn_signal_forwarder(tx: mpsc::Sender<HostSignal>) -> std::io::Result<()> {
    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        loop {
            let host_signal = tokio::select! {
                _ = sighup.recv() => {
                    info!("Received SIGHUP, delivering start command");
                    HostSignal::Start
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down...");
                    HostSignal::Terminate
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down...");
                    HostSignal::Terminate
                }
            };
            if tx.send(host_signal).await.is_err() {
                break;
            }
        }
    });
    Ok(())
}

/// Startup marker prefix written to log before anything else.
/// CLI uses this to find where the current startup attempt begins.
/// Full format: "--- fdkd: starting (pid: 12345)"
pub const STARTUP_MARKER_PREFIX: &str = "--- fdkd: starting (pid: ";

/// Write startup marker to log file (appends to existing log)
fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}{})", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

/// Write startup error synchronously to log file.
fn write_startup_error(config: &Config, error: &LifecycleError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        config
            .log_path
            .file_name()
            .ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
