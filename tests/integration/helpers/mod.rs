//! Helpers for running the chatlens binary

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Path to a fixture file
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Run chatlens with an isolated HOME and no provider credentials.
pub fn run_chatlens(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_chatlens"))
        .args(args)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("OPENAI_API_KEY")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("REPLICATE_API_TOKEN")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute chatlens");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

/// Fresh empty HOME directory
pub fn temp_home() -> TempDir {
    TempDir::new().expect("Failed to create temp home")
}
