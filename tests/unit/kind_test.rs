//! Unit tests for analysis kinds and routing

use chatlens::analyzer::prompt::prompt_for;
use chatlens::analyzer::{AnalysisKind, BackendRole, Router};

#[test]
fn every_kind_parses_from_name_and_alias() {
    for kind in AnalysisKind::all() {
        assert_eq!(kind.as_str().parse::<AnalysisKind>().unwrap(), *kind);
        assert_eq!(kind.alias().parse::<AnalysisKind>().unwrap(), *kind);
    }
}

#[test]
fn kind_names_are_case_insensitive() {
    assert_eq!("  MEMORY ".parse::<AnalysisKind>().unwrap(), AnalysisKind::Memory);
    assert_eq!("Rap".parse::<AnalysisKind>().unwrap(), AnalysisKind::Lyric);
}

#[test]
fn unknown_kind_is_rejected_by_router() {
    let err = Router::default().route_name("unknown-kind").unwrap_err();
    assert_eq!(err.0, "unknown-kind");
}

#[test]
fn only_image_goes_to_secondary() {
    let router = Router::default();
    for kind in AnalysisKind::all() {
        let route = router.route(*kind);
        if *kind == AnalysisKind::Image {
            assert_eq!(route.role, BackendRole::Secondary);
            assert_eq!(route.max_output_tokens, 4000);
        } else {
            assert_eq!(route.role, BackendRole::Primary);
            assert_eq!(route.max_output_tokens, 5000);
        }
        assert_eq!(route.prompt_text, prompt_for(*kind));
    }
}

#[test]
fn prompts_are_distinct_and_non_empty() {
    let prompts: Vec<_> = AnalysisKind::all().iter().map(|k| prompt_for(*k)).collect();
    for (i, prompt) in prompts.iter().enumerate() {
        assert!(!prompt.trim().is_empty());
        for other in &prompts[i + 1..] {
            assert_ne!(prompt, other);
        }
    }
}

#[test]
fn kind_serializes_with_canonical_name() {
    assert_eq!(
        serde_json::to_string(&AnalysisKind::Narrative).unwrap(),
        "\"past\""
    );
}
