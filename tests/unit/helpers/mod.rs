//! Test helper utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get the path to the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Load a fixture file's contents
pub fn load_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Write a config file into a fresh temp directory
pub fn temp_config(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, contents).expect("Failed to write temp config");
    (temp_dir, path)
}

/// Transcript of `lines` timestamped lines alternating between two speakers
pub fn timestamped_transcript(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            let speaker = if i % 2 == 0 { "Alice" } else { "Bob" };
            format!(
                "2024/{:02}/{:02} 12:{:02}, {} : message number {}",
                i % 12 + 1,
                i % 28 + 1,
                i % 60,
                speaker,
                i
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
