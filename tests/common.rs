#![allow(dead_code)]
use assert_cmd::{cargo_bin_cmd, Command};
use std::path::PathBuf;

/// Points at a port nothing listens on, so any request would fail loudly.
pub const UNREACHABLE_SERVICE: &str = "http://127.0.0.1:9";

pub fn dashboard() -> Command {
    cargo_bin_cmd!("feedback-dashboard")
}

/// Command with an isolated (absent) config file and an unreachable service.
pub fn offline(dir: &tempfile::TempDir) -> Command {
    let config: PathBuf = dir.path().join("config.yaml");
    let mut cmd = dashboard();
    cmd.env_remove("FEEDBACK_SERVICE_URL")
        .arg("--config")
        .arg(config)
        .arg("--service-url")
        .arg(UNREACHABLE_SERVICE)
        .arg("--no-color");
    cmd
}
