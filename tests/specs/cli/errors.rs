//! CLI error handling specs

use crate::prelude::*;

#[test]
fn unknown_command_fails() {
    cli().args(&["frobnicate"]).fails().stderr_has("unrecognized subcommand");
}

#[test]
fn start_without_config_fails_without_launching_daemon() {
    let host = Host::empty();

    host.fdk()
        .args(&["start"])
        .fails()
        .stderr_has("no agent configured");

    assert!(!host.pid_file().exists());
}

#[test]
fn trace_without_config_fails() {
    let host = Host::empty();

    host.fdk()
        .args(&["trace"])
        .fails()
        .stderr_has("no trace file configured");
}

#[test]
fn trace_flag_requires_command() {
    let host = Host::empty();

    host.fdk()
        .args(&["start", "--trace", "/tmp/agent.trace"])
        .fails()
        .stderr_has("--command");
}

#[test]
fn stop_when_daemon_not_running_succeeds() {
    let host = Host::empty();

    host.fdk()
        .args(&["stop"])
        .passes()
        .stdout_eq("fdkd not running\n");
}

#[test]
fn boot_with_empty_state_does_nothing() {
    let host = Host::empty();

    host.fdk()
        .args(&["boot"])
        .passes()
        .stdout_has("nothing to restore");

    assert!(!host.pid_file().exists());
}
