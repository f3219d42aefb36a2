//! fdkd argument handling specs

use crate::prelude::*;

#[test]
fn fdkd_help_shows_usage() {
    daemon()
        .args(&["--help"])
        .passes()
        .stdout_has("USAGE:")
        .stdout_has("SIGHUP");
}

#[test]
fn fdkd_version_shows_version() {
    daemon().args(&["--version"]).passes().stdout_has("fdkd 0.1");
}

#[test]
fn fdkd_rejects_unknown_arguments() {
    daemon()
        .args(&["--foreground"])
        .fails()
        .stderr_has("unexpected argument '--foreground'");
}
