//! Behavioral specifications for the fdk CLI and the fdkd daemon.
//!
//! These tests are black-box: they invoke the built binaries and verify
//! stdout, stderr, exit codes, and the files left in the state directory.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;
#[path = "specs/cli/status.rs"]
mod cli_status;

// daemon/
#[path = "specs/daemon/help.rs"]
mod daemon_help;
#[path = "specs/daemon/lifecycle.rs"]
mod daemon_lifecycle;
