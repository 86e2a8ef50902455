//! Unit tests for the analyzer service through its public API

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chatlens::analyzer::backend::BackendResult;
use chatlens::analyzer::{
    AnalysisError, AnalysisOutput, AnalyzeRequest, AnalyzerService, BackendError, BackendRole,
    BackendSet, GenerationBackend, GenerationClient, GenerationRequest, PrepareConfig,
    RetryPolicy, Router,
};

/// Counts calls and answers according to a closure.
struct ScriptedBackend<F> {
    calls: Arc<AtomicUsize>,
    answer: F,
}

impl<F> GenerationBackend for ScriptedBackend<F>
where
    F: Fn(usize, &GenerationRequest) -> BackendResult<String> + Send + Sync,
{
    fn name(&self) -> &'static str {
        "Scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }

    fn invoke(&self, request: &GenerationRequest) -> BackendResult<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        (self.answer)(n, request)
    }
}

fn service<F>(answer: F, limits: PrepareConfig) -> (AnalyzerService, Arc<AtomicUsize>)
where
    F: Fn(usize, &GenerationRequest) -> BackendResult<String> + Send + Sync + 'static,
{
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = ScriptedBackend {
        calls: calls.clone(),
        answer,
    };
    let client = GenerationClient::new(
        BackendSet::empty().with_backend(BackendRole::Primary, Box::new(backend)),
        RetryPolicy::immediate(3),
    );
    (
        AnalyzerService::new(Router::default(), limits, client),
        calls,
    )
}

#[test]
fn unknown_kind_never_calls_a_backend() {
    let (service, calls) = service(|_, _| Ok("never".to_string()), PrepareConfig::default());
    let err = service.analyze("unknown-kind", "Alice : hi").unwrap_err();
    assert!(matches!(err, AnalysisError::UnknownKind { .. }));
    assert!(err.to_string().contains("Invalid analysis type"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn three_failures_exhaust_retries() {
    let (service, calls) = service(
        |_, _| Err(BackendError::Transport("connection reset".to_string())),
        PrepareConfig::default(),
    );
    let err = service.analyze("basic", "Alice : hi").unwrap_err();
    match &err {
        AnalysisError::ExhaustedRetries { attempts, .. } => assert_eq!(*attempts, 3),
        other => panic!("expected exhausted retries, got {:?}", other),
    }
    assert_eq!(err.status(), 500);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn success_on_third_attempt() {
    let (service, calls) = service(
        |n, _| {
            if n < 2 {
                Err(BackendError::Transport("flaky".to_string()))
            } else {
                Ok("finally".to_string())
            }
        },
        PrepareConfig::default(),
    );
    assert_eq!(
        service.analyze("emotion", "Alice : yay").unwrap(),
        AnalysisOutput::Text("finally".to_string())
    );
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn split_results_are_merged_in_order() {
    let limits = PrepareConfig {
        truncate_chars: 20,
        split_threshold_chars: 40,
        split_half_chars: 20,
    };
    let (service, calls) = service(
        |_, request| {
            // The first half ends with the middle marker
            if request.input_text.contains("middle") {
                std::thread::sleep(std::time::Duration::from_millis(30));
                Ok("EARLY".to_string())
            } else {
                Ok("LATE".to_string())
            }
        },
        limits,
    );
    let transcript = "Alice : ".to_string() + &"z".repeat(100);
    assert_eq!(
        service.analyze("memory-timeline", &transcript).unwrap(),
        AnalysisOutput::Text("EARLY\n\nLATE".to_string())
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn split_fails_when_one_half_fails() {
    let limits = PrepareConfig {
        truncate_chars: 20,
        split_threshold_chars: 40,
        split_half_chars: 20,
    };
    let (service, _) = service(
        |_, request| {
            if request.input_text.contains("middle") {
                Ok("EARLY".to_string())
            } else {
                Err(BackendError::Transport("down".to_string()))
            }
        },
        limits,
    );
    let err = service.analyze("memory", &"q".repeat(100)).unwrap_err();
    assert!(matches!(err, AnalysisError::SplitPartialFailure { .. }));
}

#[test]
fn image_kind_without_secondary_is_not_configured() {
    let (service, calls) = service(|_, _| Ok("x".to_string()), PrepareConfig::default());
    let reply = service.analyze_request(&AnalyzeRequest {
        kind: "image".to_string(),
        transcript: "Alice : draw us".to_string(),
        part: None,
    });
    assert_eq!(reply.status, 500);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn request_envelope_round_trip() {
    let (service, _) = service(|_, _| Ok("story".to_string()), PrepareConfig::default());
    let request: AnalyzeRequest =
        serde_json::from_str(r#"{"type": "past", "chatData": "Alice : once upon a time"}"#)
            .unwrap();
    let reply = service.analyze_request(&request);
    assert!(reply.is_success());
    assert_eq!(
        serde_json::to_value(&reply.body).unwrap(),
        serde_json::json!({"result": "story"})
    );
}
