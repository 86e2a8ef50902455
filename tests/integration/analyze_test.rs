//! Analyze command tests that never reach a provider
//!
//! Every case fails (or is rejected) before a network call: unknown kinds,
//! empty transcripts and missing credentials.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::helpers::{fixture, temp_home};

fn chatlens(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("chatlens").expect("binary builds");
    cmd.env("HOME", home)
        .env_remove("OPENAI_API_KEY")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("REPLICATE_API_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn unknown_kind_exits_with_client_error() {
    let home = temp_home();
    chatlens(home.path())
        .args(["analyze", "unknown-kind"])
        .write_stdin("Alice : hi")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid analysis type 'unknown-kind'"));
}

#[test]
fn unknown_kind_json_envelope() {
    let home = temp_home();
    chatlens(home.path())
        .args(["analyze", "unknown-kind", "--json"])
        .write_stdin("Alice : hi")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"error\""))
        .stdout(predicate::str::contains("Available types"));
}

#[test]
fn empty_transcript_exits_with_client_error() {
    let home = temp_home();
    chatlens(home.path())
        .args(["analyze", "basic", "-"])
        .write_stdin("   \n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn missing_api_key_is_a_server_error() {
    let home = temp_home();
    chatlens(home.path())
        .arg("analyze")
        .arg("report")
        .arg(fixture("chat_sample.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn configured_key_variable_is_named_in_error() {
    let home = temp_home();
    let config = home.path().join("config.toml");
    std::fs::write(&config, "[backends.secondary]\napi_key_env = \"TEAM_CLAUDE_KEY\"\n").unwrap();
    chatlens(home.path())
        .env_remove("TEAM_CLAUDE_KEY")
        .arg("--config")
        .arg(&config)
        .args(["analyze", "image-prompt"])
        .write_stdin("Alice : paint us")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TEAM_CLAUDE_KEY"));
}

#[test]
fn request_mode_reads_json_request() {
    let home = temp_home();
    chatlens(home.path())
        .args(["analyze", "ignored", "--request", "--json"])
        .write_stdin(r#"{"type": "nope", "chatData": "Alice : hi"}"#)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Invalid analysis type 'nope'"));
}

#[test]
fn malformed_request_is_rejected() {
    let home = temp_home();
    chatlens(home.path())
        .args(["analyze", "basic", "--request"])
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON request"));
}

#[test]
fn missing_file_is_reported() {
    let home = temp_home();
    chatlens(home.path())
        .args(["analyze", "basic", "/nonexistent/chat.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read transcript"));
}
