//! Daemon lifecycle specs: start, supervise, stop

use crate::prelude::*;

fn trace_contains(host: &Host, needle: &str) -> bool {
    std::fs::read_to_string(host.trace_file())
        .map(|s| s.contains(needle))
        .unwrap_or(false)
}

#[test]
fn start_launches_daemon_and_agent() {
    let host = Host::empty();
    let agent = host.sleeping_agent();

    host.fdk()
        .args(&["start", "--command", agent.to_str().unwrap()])
        .passes()
        .stdout_has("fdkd started");

    assert!(
        wait_for(SPEC_WAIT_MAX_MS, || trace_contains(&host, "agent -f -d 100 -dt")),
        "agent output never reached the trace\n{}",
        host.daemon_log()
    );

    host.fdk()
        .args(&["status"])
        .passes()
        .stdout_has("fdkd:     running (pid ")
        .stdout_has("desired:  running\n")
        .stdout_has(&format!("command:  {}\n", agent.display()));
}

#[test]
fn custom_level_is_passed_to_agent() {
    let host = Host::empty();
    let agent = host.sleeping_agent();

    host.fdk()
        .args(&["start", "--command", agent.to_str().unwrap(), "--level", "300"])
        .passes();

    assert!(
        wait_for(SPEC_WAIT_MAX_MS, || trace_contains(&host, "agent -f -d 300 -dt")),
        "{}",
        host.daemon_log()
    );
}

#[test]
fn second_start_signals_existing_daemon() {
    let host = Host::empty();
    let agent = host.sleeping_agent();
    host.fdk()
        .args(&["start", "--command", agent.to_str().unwrap()])
        .passes();
    let pid = host.daemon_pid().unwrap();

    host.fdk()
        .args(&["start"])
        .passes()
        .stdout_has(&format!("delivered to fdkd (pid {pid})"));

    assert_eq!(host.daemon_pid(), Some(pid));
}

#[test]
fn stop_terminates_daemon_and_records_intent() {
    let host = Host::empty();
    let agent = host.sleeping_agent();
    host.fdk()
        .args(&["start", "--command", agent.to_str().unwrap()])
        .passes();

    host.fdk().args(&["stop"]).passes().stdout_has("fdkd ");

    // fdkd removes its pid file on the way out
    assert!(
        wait_for(SPEC_WAIT_MAX_MS, || !host.pid_file().exists()),
        "pid file left behind\n{}",
        host.daemon_log()
    );
    host.fdk()
        .args(&["status"])
        .passes()
        .stdout_has("fdkd:     not running\n")
        .stdout_has("desired:  stopped\n");
}

#[test]
fn boot_restores_agent_left_running() {
    let host = Host::empty();
    let agent = host.sleeping_agent();
    // State left behind by a host that went down with the agent running
    let state = serde_json::json!({
        "command": agent.to_str().unwrap(),
        "tracePath": host.trace_file().to_str().unwrap(),
        "logLevel": "100",
        "running": true,
    });
    std::fs::write(
        host.state_path().join("fdk.agent.json"),
        serde_json::to_string(&state).unwrap(),
    )
    .unwrap();

    host.fdk()
        .args(&["boot"])
        .passes()
        .stdout_has("fdkd started");

    assert!(
        wait_for(SPEC_WAIT_MAX_MS, || trace_contains(&host, "agent -f -d 100 -dt")),
        "{}",
        host.daemon_log()
    );
}

#[test]
fn trace_prints_agent_output() {
    let host = Host::empty();
    let agent = host.sleeping_agent();
    host.fdk()
        .args(&["start", "--command", agent.to_str().unwrap()])
        .passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || trace_contains(&host, "agent")));

    host.fdk()
        .args(&["trace"])
        .passes()
        .stdout_has("agent -f -d 100 -dt");
}

#[test]
fn second_daemon_refuses_to_start() {
    let host = Host::empty();
    let agent = host.sleeping_agent();
    host.fdk()
        .args(&["start", "--command", agent.to_str().unwrap()])
        .passes();

    host.fdkd().fails().stderr_has("fdkd is already running");
}
