//! Common test utilities for dlsetup integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// One isolated invocation environment with its own log file location
#[allow(dead_code)]
pub struct TestRun {
    /// Temporary directory holding the log file
    pub temp: TempDir,
    /// Log file path handed to the binary via DLSETUP_LOG_FILE
    pub log_path: PathBuf,
}

#[allow(dead_code)]
impl TestRun {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp.path().join("dlsetup.log");
        Self { temp, log_path }
    }

    /// Command for the dlsetup binary with the log file redirected into the
    /// test's temporary directory
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("dlsetup").expect("Failed to find dlsetup binary");
        cmd.env("DLSETUP_LOG_FILE", &self.log_path);
        cmd
    }

    pub fn log_exists(&self) -> bool {
        self.log_path.exists()
    }

    pub fn log_contents(&self) -> String {
        std::fs::read_to_string(&self.log_path).expect("Failed to read log file")
    }
}

/// Whether the test process itself has administrative rights
#[allow(dead_code)]
pub fn running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}
