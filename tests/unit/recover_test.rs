//! Unit tests for structured payload recovery

use chatlens::analyzer::recover::{parse_strict, recover, strip_code_fence};
use chatlens::analyzer::repair::parse_lenient;
use chatlens::analyzer::{RecoveryError, StructuredPayload};

fn payload(prompt: &str, explanation: &str) -> StructuredPayload {
    StructuredPayload {
        prompt: prompt.to_string(),
        explanation: explanation.to_string(),
    }
}

#[test]
fn fenced_payload_is_accepted() {
    let raw = "Here you go:\n```json\n{\"prompt\": \"a lighthouse at dusk\", \"explanation\": \"late talks\"}\n```\nEnjoy!";
    assert_eq!(
        recover(raw).unwrap(),
        payload("a lighthouse at dusk", "late talks")
    );
}

#[test]
fn trailing_comma_fails_strict_but_repairs() {
    let raw = r#"{"prompt":"a cat",}"#;
    assert!(serde_json::from_str::<serde_json::Value>(raw).is_err());
    let repaired = parse_lenient(raw).unwrap();
    assert_eq!(repaired["prompt"], "a cat");
    // Syntax is fixed but the payload is still incomplete
    assert_eq!(
        recover(raw).unwrap_err(),
        RecoveryError::MissingField("explanation")
    );
}

#[test]
fn repaired_payload_with_both_fields_is_accepted() {
    let raw = "{prompt: 'two mugs', explanation: 'morning coffee',}";
    assert!(parse_strict(raw).is_err());
    assert_eq!(recover(raw).unwrap(), payload("two mugs", "morning coffee"));
}

#[test]
fn strict_acceptance_implies_recovery() {
    let inputs = [
        r#"{"prompt": "p", "explanation": "e"}"#,
        "```\n{\"prompt\": \"p\", \"explanation\": \"e\", \"extra\": 1}\n```",
        r#"  {"explanation": "why", "prompt": "what"}  "#,
        r#"{"prompt": "quote \" inside", "explanation": "unicode é"}"#,
    ];
    for raw in inputs {
        let strict = parse_strict(raw).unwrap();
        assert_eq!(recover(raw).unwrap(), strict, "input: {}", raw);
    }
}

#[test]
fn empty_fields_are_rejected() {
    assert_eq!(
        recover(r#"{"prompt": "  ", "explanation": "e"}"#).unwrap_err(),
        RecoveryError::MissingField("prompt")
    );
    assert_eq!(
        recover(r#"{"prompt": "p", "explanation": 3}"#).unwrap_err(),
        RecoveryError::MissingField("explanation")
    );
}

#[test]
fn non_object_is_rejected() {
    assert_eq!(recover("[1, 2]").unwrap_err(), RecoveryError::NotObject);
}

#[test]
fn prose_without_json_is_rejected() {
    assert!(matches!(
        recover("I cannot draw that, sorry."),
        Err(RecoveryError::NotJson(_))
    ));
}

#[test]
fn fence_without_closing_is_tolerated() {
    assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    assert_eq!(strip_code_fence("  plain  "), "plain");
}
