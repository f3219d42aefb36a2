//! CLI help output specs

use crate::prelude::*;

#[test]
fn fdk_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn fdk_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("start")
        .stdout_has("stop")
        .stdout_has("boot")
        .stdout_has("status")
        .stdout_has("trace");
}

#[test]
fn fdk_start_help_shows_options() {
    cli()
        .args(&["start", "--help"])
        .passes()
        .stdout_has("--command")
        .stdout_has("--trace")
        .stdout_has("--level");
}

#[test]
fn fdk_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
