//! Unit tests for transcript preparation

use chatlens::analyzer::prepare::{
    normalize, prepare, PreparedInput, EARLIER_OMITTED_MARKER, MIDDLE_OMITTED_MARKER,
};
use chatlens::analyzer::{AnalysisKind, PrepareConfig};

use crate::helpers::{load_fixture, timestamped_transcript};

#[test]
fn timestamp_prefix_is_collapsed() {
    assert_eq!(normalize("2024/08/10 23:03, Alice : hello"), "Alice : hello");
}

#[test]
fn fixture_loses_every_timestamp() {
    let normalized = normalize(&load_fixture("chat_sample.txt"));
    assert!(!normalized.contains("2024/"));
    assert!(normalized.starts_with("Alice : are you still up?"));
    assert_eq!(normalized.lines().count(), 6);
}

#[test]
fn short_transcript_is_returned_unchanged() {
    let raw = "Alice : hi\nBob : hey";
    for kind in AnalysisKind::all() {
        assert_eq!(
            prepare(raw, *kind, &PrepareConfig::default()),
            PreparedInput::Whole {
                text: raw.to_string(),
                truncated: false,
            }
        );
    }
}

#[test]
fn long_transcript_keeps_its_most_recent_part() {
    let normalized: String = "ab".repeat(60_000) + "END";
    let len = normalized.chars().count();
    assert!(len > 100_000);

    match prepare(&normalized, AnalysisKind::Report, &PrepareConfig::default()) {
        PreparedInput::Whole { text, truncated } => {
            assert!(truncated);
            assert!(text.chars().count() <= 100_000 + EARLIER_OMITTED_MARKER.chars().count());
            let core = text.strip_suffix(EARLIER_OMITTED_MARKER).unwrap();
            let expected: String = normalized.chars().skip(len - 100_000).collect();
            assert_eq!(core, expected);
            assert!(core.ends_with("END"));
        }
        other => panic!("expected whole input, got {:?}", other),
    }
}

#[test]
fn long_memory_transcript_keeps_both_ends() {
    let normalized: String = format!("START{}FINISH", "m".repeat(250_000));
    let len = normalized.chars().count();

    match prepare(&normalized, AnalysisKind::Memory, &PrepareConfig::default()) {
        PreparedInput::Split {
            first_half,
            second_half,
        } => {
            let first_core = first_half.strip_suffix(MIDDLE_OMITTED_MARKER).unwrap();
            let second_core = second_half.strip_suffix(EARLIER_OMITTED_MARKER).unwrap();
            let head: String = normalized.chars().take(100_000).collect();
            let tail: String = normalized.chars().skip(len - 100_000).collect();
            assert_eq!(first_core, head);
            assert_eq!(second_core, tail);
            assert!(first_core.starts_with("START"));
            assert!(second_core.ends_with("FINISH"));
        }
        other => panic!("expected split input, got {:?}", other),
    }
}

#[test]
fn only_memory_is_split() {
    let long = "x".repeat(200_001);
    for kind in AnalysisKind::all() {
        let input = prepare(&long, *kind, &PrepareConfig::default());
        assert_eq!(input.is_split(), *kind == AnalysisKind::Memory, "kind {}", kind);
    }
}

#[test]
fn threshold_is_exclusive() {
    let at_threshold = "x".repeat(200_000);
    let input = prepare(&at_threshold, AnalysisKind::Memory, &PrepareConfig::default());
    assert!(!input.is_split());
}

#[test]
fn lengths_are_measured_after_normalization() {
    let config = PrepareConfig {
        truncate_chars: 200,
        split_threshold_chars: 400,
        split_half_chars: 200,
    };
    // Raw text is well over budget, normalized text is not
    let raw = timestamped_transcript(8);
    let normalized = normalize(&raw);
    assert!(raw.chars().count() > 200);
    assert!(normalized.chars().count() <= 200);
    assert_eq!(
        prepare(&raw, AnalysisKind::Report, &config),
        PreparedInput::Whole {
            text: normalized,
            truncated: false,
        }
    );
}

#[test]
fn multibyte_text_is_cut_on_char_boundaries() {
    let config = PrepareConfig {
        truncate_chars: 5,
        split_threshold_chars: 10,
        split_half_chars: 5,
    };
    let text = "안녕하세요반가워요고마워요사랑해요";
    match prepare(text, AnalysisKind::Memory, &config) {
        PreparedInput::Split {
            first_half,
            second_half,
        } => {
            assert!(first_half.starts_with("안녕하세요"));
            assert!(second_half.starts_with("요사랑해요"));
        }
        other => panic!("expected split input, got {:?}", other),
    }
}
