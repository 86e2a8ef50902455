//! Prompt catalog.
//!
//! Fixed instruction text for every analysis kind, compiled in from
//! `src/analyzer/prompts/*.txt`. The catalog is a pure lookup; the transcript
//! is never spliced into the instruction text; it travels as a separate
//! input message.

use super::kind::AnalysisKind;

const REPORT: &str = include_str!("prompts/report.txt");
const EMOTION: &str = include_str!("prompts/emotion.txt");
const MEMORY: &str = include_str!("prompts/memory.txt");
const NARRATIVE: &str = include_str!("prompts/narrative.txt");
const LYRIC: &str = include_str!("prompts/lyric.txt");
const ANNIVERSARY: &str = include_str!("prompts/anniversary.txt");
const IMAGE: &str = include_str!("prompts/image.txt");

/// Instruction text for `kind`.
pub fn prompt_for(kind: AnalysisKind) -> &'static str {
    match kind {
        AnalysisKind::Report => REPORT,
        AnalysisKind::Emotion => EMOTION,
        AnalysisKind::Memory => MEMORY,
        AnalysisKind::Narrative => NARRATIVE,
        AnalysisKind::Lyric => LYRIC,
        AnalysisKind::Anniversary => ANNIVERSARY,
        AnalysisKind::Image => IMAGE,
    }
}
