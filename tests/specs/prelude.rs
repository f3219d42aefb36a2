//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for driving the fdk CLI against an isolated
//! state directory.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Aggressive timeouts for fast tests.
const FDK_TIMEOUT_START_MS: &str = "3000";
const FDK_TIMEOUT_EXIT_MS: &str = "2000";
const FDK_POLL_MS: &str = "10";

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 3000;

/// Returns the path to a binary, checking llvm-cov target directory first.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR points at a stale target directory.
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // The test binary lives at target/debug/deps/specs-<hash>
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

fn fdk_binary() -> PathBuf {
    binary_path("fdk")
}

/// Returns the path to the fdkd daemon binary.
pub fn fdkd_binary() -> PathBuf {
    binary_path("fdkd")
}

/// Create a CLI builder for fdk commands
pub fn cli() -> CliBuilder {
    CliBuilder::new(fdk_binary())
}

/// Create a CLI builder for running fdkd directly
pub fn daemon() -> CliBuilder {
    CliBuilder::new(fdkd_binary())
}

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    program: PathBuf,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            envs: vec![
                (
                    "FDK_DAEMON_BINARY".into(),
                    fdkd_binary().to_string_lossy().into(),
                ),
                ("FDK_TIMEOUT_START_MS".into(), FDK_TIMEOUT_START_MS.into()),
                ("FDK_TIMEOUT_EXIT_MS".into(), FDK_TIMEOUT_EXIT_MS.into()),
                ("FDK_POLL_MS".into(), FDK_POLL_MS.into()),
                ("FDK_NO_NOTIFY".into(), "1".into()),
            ],
        }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    /// Build the command without running it
    pub fn command(self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        // A developer's own state dir must never leak into specs
        cmd.env_remove("FDK_STATE_DIR");

        for (key, value) in self.envs {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = self.stdout();
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}

// =============================================================================
// Polling
// =============================================================================

/// Poll a condition until it returns true or timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

// =============================================================================
// Host
// =============================================================================

/// Isolated machine state: a scratch directory for agent scripts plus
/// the fdk state directory.
pub struct Host {
    dir: tempfile::TempDir,
    state_dir: tempfile::TempDir,
}

impl Host {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            state_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    /// Write an executable shell script and return its path
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// An agent that echoes its arguments then idles
    pub fn sleeping_agent(&self) -> PathBuf {
        self.script("agent", "echo \"agent $*\"\nexec sleep 30")
    }

    /// Run fdk against this host's state directory
    pub fn fdk(&self) -> CliBuilder {
        cli().env("FDK_STATE_DIR", self.state_path())
    }

    /// Run fdkd directly against this host's state directory
    pub fn fdkd(&self) -> CliBuilder {
        daemon().env("FDK_STATE_DIR", self.state_path())
    }

    pub fn pid_file(&self) -> PathBuf {
        self.state_path().join("fdkd.pid")
    }

    pub fn trace_file(&self) -> PathBuf {
        self.state_path().join("agent.trace")
    }

    /// Read the daemon log file contents (for debugging test failures)
    pub fn daemon_log(&self) -> String {
        std::fs::read_to_string(self.state_path().join("fdkd.log"))
            .unwrap_or_else(|_| "(no daemon log)".to_string())
    }

    pub fn daemon_pid(&self) -> Option<u32> {
        std::fs::read_to_string(self.pid_file())
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        // Always try to stop the daemon (no-op if not running)
        let mut cmd = self.fdk().args(&["stop"]).command();
        cmd.stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        let _ = cmd.status();
    }
}
