//! Shared E2E test helpers for `tenx` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::time::Duration;

/// Default timeout for one lifecycle run.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

const TENX_VARS: &[&str] = &[
    "TENX_DEBUG",
    "TENX_LOG_LEVEL",
    "TENX_STOP_CMD",
    "TENX_STOP_TIMEOUT_MS",
    "TENX_PHASE_TIMEOUT_MS",
    "RUST_LOG",
];

/// Build a Command for the `tenx` binary isolated from the caller's config.
///
/// HOME and the project root both point at a fresh temp dir, and every
/// `TENX_*` variable is removed. Keep the guard alive for the test's duration.
pub fn tenx_cmd() -> (assert_cmd::Command, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("tenx");
    cmd.timeout(TIMEOUT_BASIC);
    for var in TENX_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", tmp.path());
    cmd.args(["-C", tmp.path().to_str().expect("valid utf8")]);
    (cmd, tmp)
}

/// Writes `<root>/.tenx/config.toml`.
pub fn write_project_config(root: &std::path::Path, content: &str) {
    let dir = root.join(".tenx");
    std::fs::create_dir_all(&dir).expect("create .tenx dir");
    std::fs::write(dir.join("config.toml"), content).expect("write config");
}
