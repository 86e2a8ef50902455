//! CLI output tests for the offline commands

use std::fs;

use crate::helpers::{fixture, run_chatlens, temp_home};

#[test]
fn help_lists_commands() {
    let home = temp_home();
    let (stdout, _, exit_code) = run_chatlens(home.path(), &["--help"]);
    assert_eq!(exit_code, 0);
    for command in ["analyze", "prepare", "kinds", "config", "completions"] {
        assert!(stdout.contains(command), "missing {} in:\n{}", command, stdout);
    }
}

#[test]
fn version_starts_with_package_version() {
    let home = temp_home();
    let (stdout, _, exit_code) = run_chatlens(home.path(), &["--version"]);
    assert_eq!(exit_code, 0);
    assert!(stdout.starts_with(&format!("chatlens {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn kinds_lists_every_kind() {
    let home = temp_home();
    let (stdout, _, exit_code) = run_chatlens(home.path(), &["kinds"]);
    assert_eq!(exit_code, 0);
    for kind in ["basic", "emotion", "memory", "past", "rap", "anniversary", "image"] {
        assert!(stdout.contains(kind), "missing {} in:\n{}", kind, stdout);
    }
    assert!(stdout.contains("secondary"));
}

#[test]
fn config_path_defaults_under_home() {
    let home = temp_home();
    let (stdout, _, exit_code) = run_chatlens(home.path(), &["config", "path"]);
    assert_eq!(exit_code, 0);
    assert!(stdout.contains(".config/chatlens/config.toml"));
    assert!(stdout.contains("not created"));
}

#[test]
fn config_path_honours_flag() {
    let home = temp_home();
    let custom = home.path().join("custom.toml");
    fs::write(&custom, "[retry]\nmax_attempts = 2\n").unwrap();
    let custom_str = custom.to_str().unwrap();
    let (stdout, _, exit_code) =
        run_chatlens(home.path(), &["--config", custom_str, "config", "path"]);
    assert_eq!(exit_code, 0);
    assert_eq!(stdout.trim(), custom_str);
}

#[test]
fn config_show_prints_effective_values() {
    let home = temp_home();
    let custom = home.path().join("custom.toml");
    fs::write(&custom, "[limits]\ntruncate_chars = 1234\n").unwrap();
    let (stdout, _, exit_code) = run_chatlens(
        home.path(),
        &["config", "show", "--config", custom.to_str().unwrap()],
    );
    assert_eq!(exit_code, 0);
    assert!(stdout.contains("truncate_chars = 1234"));
    assert!(stdout.contains("split_threshold_chars = 200000"));
    assert!(stdout.contains("[backends.primary]"));
}

#[test]
fn invalid_config_is_reported() {
    let home = temp_home();
    let custom = home.path().join("bad.toml");
    fs::write(&custom, "[retry]\nmax_attempts = 0\n").unwrap();
    let (_, stderr, exit_code) =
        run_chatlens(home.path(), &["--config", custom.to_str().unwrap(), "kinds"]);
    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Invalid config"), "stderr:\n{}", stderr);
}

#[test]
fn completions_generate_for_bash() {
    let home = temp_home();
    let (stdout, _, exit_code) = run_chatlens(home.path(), &["completions", "bash"]);
    assert_eq!(exit_code, 0);
    assert!(stdout.contains("_chatlens"));
}

#[test]
fn prepare_reports_whole_input() {
    let home = temp_home();
    let sample = fixture("chat_sample.txt");
    let (stdout, _, exit_code) =
        run_chatlens(home.path(), &["prepare", "report", sample.to_str().unwrap()]);
    assert_eq!(exit_code, 0, "stdout:\n{}", stdout);
    assert!(stdout.contains("basic (report)"));
    assert!(stdout.contains("primary"));
    assert!(stdout.contains("Prepared:    whole"));
    assert!(!stdout.contains("truncated"));
}

#[test]
fn prepare_splits_long_memory_transcript() {
    let home = temp_home();
    let config = home.path().join("small.toml");
    fs::write(
        &config,
        "[limits]\ntruncate_chars = 50\nsplit_threshold_chars = 100\nsplit_half_chars = 50\n",
    )
    .unwrap();
    let output = home.path().join("prepared.txt");
    let sample = fixture("chat_sample.txt");
    let (stdout, _, exit_code) = run_chatlens(
        home.path(),
        &[
            "--config",
            config.to_str().unwrap(),
            "prepare",
            "memory",
            sample.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ],
    );
    assert_eq!(exit_code, 0, "stdout:\n{}", stdout);
    assert!(stdout.contains("split, first half"));

    let prepared = fs::read_to_string(&output).unwrap();
    assert!(prepared.starts_with("Alice : are you still up?"));
    assert!(prepared.contains("the middle of the conversation was omitted"));
    assert!(!prepared.contains("2024/"));
}

#[test]
fn prepare_rejects_unknown_kind() {
    let home = temp_home();
    let sample = fixture("chat_sample.txt");
    let (_, stderr, exit_code) =
        run_chatlens(home.path(), &["prepare", "unknown-kind", sample.to_str().unwrap()]);
    assert_ne!(exit_code, 0);
    assert!(stderr.contains("Invalid analysis type 'unknown-kind'"));
}
